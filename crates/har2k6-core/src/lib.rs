pub mod config;
pub mod logging;
pub mod output;

pub mod convert;
pub mod har;

pub use convert::{convert, ConvertConfig, ConvertError};
pub use har::{decode, decode_reader, Archive, DecodeError};
