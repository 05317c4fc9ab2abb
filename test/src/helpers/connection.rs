use std::sync::Arc;

use syncnet_client::{ClientConfig, SynchronizerClient};
use syncnet_server::SynchronizerServer;
use syncnet_shared::{Link, LinkConfig};

use crate::local_transport::{LocalTransportPair, TransportControl};

/// The two Links of one in-memory connection, plus control over the stream
pub struct TestConnection {
    pub server_link: Arc<Link>,
    pub client_link: Arc<Link>,
    pub control: TransportControl,
}

/// Connects `client` to `server` over a fresh in-memory transport
pub fn connect(server: &mut SynchronizerServer, client: &mut SynchronizerClient) -> TestConnection {
    let pair = LocalTransportPair::new();
    let server_link = Arc::new(Link::with_transport(
        LinkConfig::default(),
        Box::new(pair.server_transport),
    ));
    let client_link = Arc::new(Link::with_transport(
        LinkConfig::default(),
        Box::new(pair.client_transport),
    ));

    server.add_client(server_link.clone());
    client.add_server(client_link.clone());

    TestConnection {
        server_link,
        client_link,
        control: pair.control,
    }
}

/// One application tick: the server broadcasts, then the client applies
pub fn tick(server: &mut SynchronizerServer, client: &mut SynchronizerClient) {
    server.update();
    client.update();
}

/// A client that records every `ReplicaEvent` for the test to inspect
pub fn recording_client() -> SynchronizerClient {
    SynchronizerClient::new(ClientConfig {
        record_events: true,
        ..Default::default()
    })
}
