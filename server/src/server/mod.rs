mod object_id_generator;

mod server_config;
pub use server_config::ServerConfig;

mod synchronizer_server;
pub use synchronizer_server::SynchronizerServer;
