pub mod connection;
pub mod frames;

pub use connection::{connect, recording_client, tick, TestConnection};
pub use frames::{link_frame, sync_frame};
