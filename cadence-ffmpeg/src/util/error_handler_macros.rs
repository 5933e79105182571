/// Call a native function that reports failure with a negative return code.
macro_rules! ffmpeg {
    { $name:ident ( $( $arg:expr ),* $(,)? ) } => {
        {
            use anyhow::bail;

            let tmp: std::ffi::c_int = unsafe {
                $name($( $arg ),*)
            };
            if tmp < 0 {
                bail!(
                    "Error when calling native function `{}` in {}:{}, error code: {}, error message: {}.",
                    stringify!($name), file!(), line!(), tmp,
                    crate::util::error_handler::error_string(tmp)
                );
            }
        }
    };
    { $name:ident ( $( $arg:expr ),* $(,)? ) or $error_message:expr } => {
        {
            use anyhow::bail;

            let tmp: std::ffi::c_int = unsafe {
                $name($( $arg ),*)
            };
            if tmp < 0 {
                bail!(
                    "{}.\nError message:\nError when calling native function `{}` in {}:{}, error code: {}, error message: {}.",
                    $error_message, stringify!($name),
                    file!(), line!(), tmp,
                    crate::util::error_handler::error_string(tmp)
                );
            }
        }
    }
}

/// Like `ffmpeg!`, but keeps the (non-negative) return value.
macro_rules! native {
    { $name:ident ( $( $arg:expr ),* $(,)? ) } => {
        {
            use anyhow::bail;

            let tmp: std::ffi::c_int = unsafe {
                $name($( $arg ),*)
            };
            if tmp < 0 {
                bail!(
                    "Error when calling native function `{}` in {}:{}, error code: {}, error message: {}.",
                    stringify!($name), file!(), line!(), tmp,
                    crate::util::error_handler::error_string(tmp)
                );
            };
            tmp
        }
    };
    { $name:ident ( $( $arg:expr ),* $(,)? ) or $error_message:expr } => {
        {
            use anyhow::bail;

            let tmp: std::ffi::c_int = unsafe {
                $name($( $arg ),*)
            };
            if tmp < 0 {
                bail!(
                    "{}.\nError message:\nError when calling native function `{}` in {}:{}, error code: {}, error message: {}.",
                    $error_message, stringify!($name),
                    file!(), line!(), tmp,
                    crate::util::error_handler::error_string(tmp)
                );
            };
            tmp
        }
    }
}
