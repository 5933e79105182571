#[macro_use]
mod error_handler_macros;
#[macro_use]
mod wrapper_macros;

pub(crate) mod error_handler;
