use crate::avpacket::AVPacket;
use crate::ffi::{av_packet_alloc, av_packet_unref};
use anyhow::{bail, Result};

impl AVPacket {
    pub fn new() -> Result<Self> {
        let packet = unsafe { av_packet_alloc() };

        if packet.is_null() {
            bail!("Failed to allocate memory by 'av_packet_alloc'.");
        }

        Ok(AVPacket { inner: packet })
    }

    /// Unreference the payload, keeping the packet itself reusable.
    pub fn release(&mut self) {
        unsafe {
            av_packet_unref(self.inner);
        }
    }
}

#[test]
fn test_packet_alloc() {
    let mut packet = AVPacket::new().unwrap();
    assert_eq!(packet.stream_index, 0);
    assert!(packet.data.is_null());
    packet.release();
}
