//! In-memory transport for E2E testing
//! Moves bytes between a server Link and a client Link without network I/O

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use syncnet_shared::Transport;

/// One direction of the stream
#[derive(Default)]
struct Pipe {
    bytes: VecDeque<u8>,
    writer_closed: bool,
}

fn lock(pipe: &Mutex<Pipe>) -> MutexGuard<'_, Pipe> {
    pipe.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One end of an in-memory stream
pub struct LocalTransport {
    outgoing: Arc<Mutex<Pipe>>,
    incoming: Arc<Mutex<Pipe>>,
    broken: Arc<AtomicBool>,
}

impl Transport for LocalTransport {
    fn send(&mut self, bytes: &[u8]) -> usize {
        if self.broken.load(Ordering::SeqCst) {
            return 0;
        }
        let mut pipe = lock(&self.outgoing);
        if pipe.writer_closed {
            return 0;
        }
        pipe.bytes.extend(bytes.iter().copied());
        bytes.len()
    }

    fn receive_available(&mut self) -> Vec<u8> {
        lock(&self.incoming).bytes.drain(..).collect()
    }

    fn is_connected(&self) -> bool {
        !self.broken.load(Ordering::SeqCst) && !lock(&self.outgoing).writer_closed
    }

    fn shutdown(&mut self) {
        lock(&self.outgoing).writer_closed = true;
    }

    fn remote_has_shutdown(&self) -> bool {
        lock(&self.incoming).writer_closed
    }

    fn bytes_queued_to_send(&self) -> usize {
        lock(&self.outgoing).bytes.len()
    }
}

/// Lets a test break the stream or write raw bytes into it
#[derive(Clone)]
pub struct TransportControl {
    server_to_client: Arc<Mutex<Pipe>>,
    client_to_server: Arc<Mutex<Pipe>>,
    broken: Arc<AtomicBool>,
}

impl TransportControl {
    /// Simulates a transport error; both ends report disconnected
    pub fn disconnect(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    /// Appends bytes the client will read as if the server had sent them
    pub fn inject_to_client(&self, bytes: &[u8]) {
        lock(&self.server_to_client).bytes.extend(bytes.iter().copied());
    }

    pub fn inject_to_server(&self, bytes: &[u8]) {
        lock(&self.client_to_server).bytes.extend(bytes.iter().copied());
    }

    /// Bytes the client has not read yet
    pub fn pending_to_client(&self) -> usize {
        lock(&self.server_to_client).bytes.len()
    }

    /// Removes bytes the client has not read yet
    pub fn drain_to_client(&self) -> Vec<u8> {
        lock(&self.server_to_client).bytes.drain(..).collect()
    }
}

/// Pair of connected server and client transports for E2E testing
pub struct LocalTransportPair {
    pub server_transport: LocalTransport,
    pub client_transport: LocalTransport,
    pub control: TransportControl,
}

impl LocalTransportPair {
    pub fn new() -> Self {
        let server_to_client = Arc::new(Mutex::new(Pipe::default()));
        let client_to_server = Arc::new(Mutex::new(Pipe::default()));
        let broken = Arc::new(AtomicBool::new(false));

        Self {
            server_transport: LocalTransport {
                outgoing: server_to_client.clone(),
                incoming: client_to_server.clone(),
                broken: broken.clone(),
            },
            client_transport: LocalTransport {
                outgoing: client_to_server.clone(),
                incoming: server_to_client.clone(),
                broken: broken.clone(),
            },
            control: TransportControl {
                server_to_client,
                client_to_server,
                broken,
            },
        }
    }
}

impl Default for LocalTransportPair {
    fn default() -> Self {
        Self::new()
    }
}
