mod client_config;
pub use client_config::ClientConfig;

mod synchronizer_client;
pub use synchronizer_client::SynchronizerClient;
