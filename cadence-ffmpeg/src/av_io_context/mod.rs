use crate::av_mem_alloc::AVMemorySegment;
use crate::ffi::{av_free, avio_alloc_context, avio_context_free, avio_flush, AVSEEK_SIZE};
use anyhow::{bail, Result};
use std::ffi::{c_int, c_void};
use std::io::{Read, Seek, SeekFrom, Write};
use std::slice;

wrap!(
    AVIOContext
);

// avio_context_free releases the context only; the working buffer stays
// with whoever allocated it.
impl Drop for AVIOContext {
    fn drop(&mut self) {
        unsafe {
            av_free((*self.inner).buffer as *mut c_void);
            avio_context_free(&mut self.inner as *mut *mut AVIOContextRaw);
        }
    }
}

unsafe impl Send for AVIOContext {}

const AVIO_BUFFER_SIZE: usize = 32 * 1024;

pub type ReadPacketCallback =
    unsafe extern "C" fn(opaque: *mut c_void, buf: *mut u8, buf_size: c_int) -> c_int;

pub type WritePacketCallback =
    unsafe extern "C" fn(opaque: *mut c_void, buf: *const u8, buf_size: c_int) -> c_int;

pub type SeekCallback =
    unsafe extern "C" fn(opaque: *mut c_void, offset: i64, whence: c_int) -> i64;

impl AVIOContext {
    pub fn alloc(
        buffer_size: usize,
        write_flag: i32,
        opaque: *mut c_void,
        read_packet: Option<ReadPacketCallback>,
        write_packet: Option<WritePacketCallback>,
        seek: Option<SeekCallback>,
    ) -> Result<AVIOContext> {
        let buffer = AVMemorySegment::new(buffer_size)?.into_raw() as *mut u8;

        let inner = unsafe {
            // The buf pointer constness of the write callback differs
            // between libavformat versions.
            let write_packet = match write_packet {
                Some(callback) => Some(std::mem::transmute(callback)),
                None => None,
            };

            avio_alloc_context(
                buffer,
                buffer_size as c_int,
                write_flag,
                opaque,
                read_packet,
                write_packet,
                seek,
            )
        };

        if inner.is_null() {
            unsafe { av_free(buffer as *mut c_void) };
            bail!("Failed to allocate AVIOContext");
        }

        Ok(AVIOContext { inner })
    }

    pub(crate) fn reading(reader: &mut MemoryReader) -> Result<AVIOContext> {
        AVIOContext::alloc(
            AVIO_BUFFER_SIZE,
            0,
            reader as *mut MemoryReader as *mut c_void,
            Some(read_packet),
            None,
            Some(seek_read),
        )
    }

    pub(crate) fn writing(writer: &mut MemoryWriter) -> Result<AVIOContext> {
        AVIOContext::alloc(
            AVIO_BUFFER_SIZE,
            1,
            writer as *mut MemoryWriter as *mut c_void,
            None,
            Some(write_packet),
            Some(seek_write),
        )
    }

    pub fn flush(&mut self) {
        unsafe {
            avio_flush(self.inner);
        }
    }
}

/// In-memory input with `Read`/`Seek` semantics for the AVIO callbacks.
#[derive(Debug)]
pub struct MemoryReader {
    data: Vec<u8>,
    pos: usize,
}

impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.data.len() - self.pos;
        let to_read = buf.len().min(remaining);
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        Ok(to_read)
    }
}

impl Seek for MemoryReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 || new_pos > self.data.len() as i64 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek out of bounds",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

/// In-memory output. Seeking back and rewriting is supported because muxers
/// patch headers after the fact.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    data: Vec<u8>,
    pos: usize,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<u8> {
        self.pos = 0;
        std::mem::take(&mut self.data)
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryWriter {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

unsafe extern "C" fn read_packet(opaque: *mut c_void, buf: *mut u8, buf_size: c_int) -> c_int {
    let reader = unsafe { &mut *(opaque as *mut MemoryReader) };
    let slice = unsafe { slice::from_raw_parts_mut(buf, buf_size as usize) };
    match reader.read(slice) {
        Ok(0) => crate::ffi::AVERROR_EOF,
        Ok(n) => n as c_int,
        Err(_) => -1,
    }
}

unsafe extern "C" fn seek_read(opaque: *mut c_void, offset: i64, whence: c_int) -> i64 {
    let reader = unsafe { &mut *(opaque as *mut MemoryReader) };

    if whence & AVSEEK_SIZE as c_int != 0 {
        return reader.data.len() as i64;
    }

    let seek_from = match whence {
        0 => SeekFrom::Start(offset as u64),
        1 => SeekFrom::Current(offset),
        2 => SeekFrom::End(offset),
        _ => return -1,
    };

    match reader.seek(seek_from) {
        Ok(pos) => pos as i64,
        Err(_) => -1,
    }
}

unsafe extern "C" fn write_packet(opaque: *mut c_void, buf: *const u8, buf_size: c_int) -> c_int {
    let writer = unsafe { &mut *(opaque as *mut MemoryWriter) };
    let slice = unsafe { slice::from_raw_parts(buf, buf_size as usize) };
    match writer.write(slice) {
        Ok(n) => n as c_int,
        Err(_) => -1,
    }
}

unsafe extern "C" fn seek_write(opaque: *mut c_void, offset: i64, whence: c_int) -> i64 {
    let writer = unsafe { &mut *(opaque as *mut MemoryWriter) };

    if whence & AVSEEK_SIZE as c_int != 0 {
        return writer.data.len() as i64;
    }

    let seek_from = match whence {
        0 => SeekFrom::Start(offset as u64),
        1 => SeekFrom::Current(offset),
        2 => SeekFrom::End(offset),
        _ => return -1,
    };

    match writer.seek(seek_from) {
        Ok(pos) => pos as i64,
        Err(_) => -1,
    }
}

#[test]
fn test_memory_writer_patches_in_place() {
    let mut writer = MemoryWriter::new();
    writer.write_all(b"RIFF\0\0\0\0data").unwrap();
    writer.seek(SeekFrom::Start(4)).unwrap();
    writer.write_all(&42u32.to_le_bytes()).unwrap();
    let data = writer.take();
    assert_eq!(&data[..4], b"RIFF");
    assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 42);
    assert_eq!(&data[8..], b"data");
}

#[test]
fn test_memory_reader_bounds() {
    let mut reader = MemoryReader::new(vec![1, 2, 3, 4]);
    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 4);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert!(reader.seek(SeekFrom::Start(5)).is_err());
    assert_eq!(reader.seek(SeekFrom::End(-2)).unwrap(), 2);
}
