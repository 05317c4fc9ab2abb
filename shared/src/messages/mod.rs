pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod sync_message;
