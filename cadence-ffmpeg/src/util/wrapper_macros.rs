macro_rules! wrap_raw_alias {
    ($name:ident) => {
        paste::paste! {
            use crate::ffi::$name as [<$name Raw>];
        }
    };
    ($name:ident $raw:ident) => {
        paste::paste! {
            use crate::ffi::$raw as [<$name Raw>];
        }
    };
}

/// Generate an owning wrapper around a raw FFmpeg pointer: `Deref`/`DerefMut`
/// to the native struct, optional extra fields, and a `Drop` calling either a
/// `fn(*mut T)` (`drop`) or `fn(*mut *mut T)` (`drop2`) release function.
/// `as Raw` lets two wrappers with different lifecycles share one native type.
macro_rules! wrap {
    (
        $(
            $name:ident
            $(as $raw:ident)?
            $({ $( $field_name:ident : $field_value:ty ),* $(,)? })?
            $(drop $drop:ident)?
            $(drop2 $drop2:ident)?
        ),+ $(,)?
    ) => {
        use std::ops::{Deref, DerefMut};

        $(
            wrap_raw_alias!($name $($raw)?);

            paste::paste! {
                #[derive(Debug)]
                pub struct $name {
                    pub(crate) inner: *mut [<$name Raw>],
                    $($(
                        $field_name: $field_value,
                    )*)?
                }

                impl Deref for $name {
                    type Target = [<$name Raw>];

                    fn deref(&self) -> &Self::Target {
                        unsafe {
                            &*self.inner
                        }
                    }
                }

                impl DerefMut for $name {
                    fn deref_mut(&mut self) -> &mut Self::Target {
                        unsafe {
                            &mut *self.inner
                        }
                    }
                }

                $(
                    impl std::ops::Drop for $name {
                        fn drop(&mut self) {
                            unsafe {
                                crate::ffi::$drop(self.inner);
                            }
                        }
                    }
                )?

                $(
                    impl std::ops::Drop for $name {
                        fn drop(&mut self) {
                            unsafe {
                                crate::ffi::$drop2(&mut self.inner as *mut *mut [<$name Raw>]);
                            }
                        }
                    }
                )?
            }
        )+
    };
}
