pub mod error;
pub mod link;
pub mod link_config;
pub mod transport;
