pub mod error;
pub mod link_set;
