use std::sync::Arc;

use log::{debug, info, warn};

use syncnet_shared::{
    ChannelId, Link, LinkError, LinkId, LinkSet, MessageEncoder, ObjectId, ObjectStore,
    Replicate, SyncError, SyncMessage,
};

use super::{object_id_generator::ObjectIdGenerator, server_config::ServerConfig};
use crate::client_scope::ClientScope;

/// The authoritative side of replication.
///
/// Owns the master copy of every replicated object and, once per call to
/// [`update`](Self::update), tells each connected client what was created,
/// what changed, and what was destroyed since it last heard.
pub struct SynchronizerServer {
    config: ServerConfig,
    objects: ObjectStore,
    clients: LinkSet<ClientScope>,
    id_generator: ObjectIdGenerator,
    pending_destroys: Vec<ObjectId>,
}

impl SynchronizerServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            objects: ObjectStore::new(),
            clients: LinkSet::new(),
            id_generator: ObjectIdGenerator::new(),
            pending_destroys: Vec::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Objects

    /// Takes ownership of `object` and assigns it a fresh id. Clients first
    /// hear of it on the next `update`.
    ///
    /// # Panics
    ///
    /// Panics if the object is already bound to an id, which only happens
    /// for objects taken out of another Synchronizer, or if every object id
    /// is in use.
    pub fn create_object<T: Replicate>(&mut self, object: T) -> ObjectId {
        self.try_create_object(object)
            .expect("object could not be registered")
    }

    pub fn try_create_object<T: Replicate>(&mut self, mut object: T) -> Result<ObjectId, SyncError> {
        if let Some(existing) = object.object_id() {
            return Err(SyncError::DuplicateObject {
                object_id: existing,
            });
        }

        let objects = &self.objects;
        let pending_destroys = &self.pending_destroys;
        let object_id = self
            .id_generator
            .generate(|object_id| {
                objects.contains(object_id) || pending_destroys.contains(object_id)
            })
            .ok_or(SyncError::ObjectIdsExhausted)?;

        object
            .synced_object_mut()
            .assign_id(object_id)
            .map_err(|error| SyncError::from_object_error(object_id, error))?;
        self.objects.insert(object_id, Box::new(object));
        debug!("Created object {}", object_id);
        Ok(object_id)
    }

    /// Removes an object. Clients that know it receive Destroy on the next
    /// `update`.
    pub fn destroy_object(&mut self, object_id: &ObjectId) -> Result<(), SyncError> {
        if self.objects.remove(object_id).is_none() {
            return Err(SyncError::ObjectNotFound {
                object_id: *object_id,
            });
        }
        self.pending_destroys.push(*object_id);
        debug!("Destroyed object {}", object_id);
        Ok(())
    }

    pub fn object<T: Replicate>(&self, object_id: &ObjectId) -> Option<&T> {
        self.objects.get_typed::<T>(object_id)
    }

    pub fn object_mut<T: Replicate>(&mut self, object_id: &ObjectId) -> Option<&mut T> {
        self.objects.get_typed_mut::<T>(object_id)
    }

    pub fn has_object(&self, object_id: &ObjectId) -> bool {
        self.objects.contains(object_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &dyn Replicate)> {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // Clients

    /// Registers a client Link with an empty known set. Returns false if the
    /// Link is already registered.
    pub fn add_client(&mut self, link: Arc<Link>) -> bool {
        let link_id = link.id();
        let added = self.clients.insert(link, ClientScope::new());
        if added {
            info!("Client {} added", link_id);
        }
        added
    }

    /// Drops a client and its known set. Removing an unknown Link is a no-op.
    pub fn remove_client(&mut self, link_id: &LinkId) -> bool {
        let removed = self.clients.remove(link_id).is_some();
        if removed {
            info!("Client {} removed", link_id);
        }
        removed
    }

    pub fn has_client(&self, link_id: &LinkId) -> bool {
        self.clients.contains(link_id)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Whether the client has been told the object exists
    pub fn client_knows(&self, link_id: &LinkId, object_id: &ObjectId) -> bool {
        self.clients
            .get(link_id)
            .is_some_and(|scope| scope.knows(object_id))
    }

    pub fn client_known_count(&self, link_id: &LinkId) -> Option<usize> {
        self.clients.get(link_id).map(|scope| scope.len())
    }

    // Tick

    /// Runs one broadcast pass. Never blocks: outgoing bytes are only queued
    /// on each Link.
    ///
    /// Clients whose Link is disconnected are dropped first. Every remaining
    /// client then receives, in one Link frame: Create for each object it
    /// does not know yet, Update with the dirty fields of each object it
    /// does know, and Destroy for each object it knew that has since been
    /// destroyed. Dirty flags are cleared once all clients are served.
    pub fn update(&mut self) {
        for (link, _) in self.clients.prune_disconnected() {
            info!("Client {} disconnected, dropping its known set", link.id());
        }

        let destroyed = std::mem::take(&mut self.pending_destroys);
        let channel = self.config.channel;

        for (link, scope) in self.clients.iter_mut() {
            let mut encoder = MessageEncoder::new();

            for (object_id, object) in self.objects.iter() {
                let message = if scope.knows(&object_id) {
                    let mut fields = Vec::new();
                    object.for_each_dirty_field(&mut |index, value| fields.push((index, value)));
                    if fields.is_empty() {
                        continue;
                    }
                    SyncMessage::Update { object_id, fields }
                } else {
                    SyncMessage::Create {
                        object_id,
                        type_tag: object.type_tag(),
                        values: object.field_values(),
                    }
                };

                match encoder.encode(&message) {
                    Ok(()) => {
                        if matches!(message, SyncMessage::Create { .. }) {
                            scope.learn(object_id);
                        }
                    }
                    Err(error) => {
                        warn!("Cannot encode {} for object {}: {}", message.get_type(), object_id, error);
                    }
                }
            }

            for object_id in &destroyed {
                if !scope.forget(object_id) {
                    continue;
                }
                let message = SyncMessage::Destroy {
                    object_id: *object_id,
                };
                if let Err(error) = encoder.encode(&message) {
                    warn!("Cannot encode Destroy for object {}: {}", object_id, error);
                }
            }

            if encoder.is_empty() {
                continue;
            }
            let message_count = encoder.message_count();
            match send_payload(link, channel, &encoder.take_bytes()) {
                Ok(queued) => {
                    debug!("Sent {} messages ({} bytes) to {}", message_count, queued, link.id());
                }
                Err(error) => {
                    // The client's known set no longer matches what it received
                    warn!("Failed to send to {}: {}", link.id(), error);
                    link.mark_unusable(error.to_string());
                }
            }
        }

        self.objects.clear_dirty();
    }
}

impl Default for SynchronizerServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

/// Sends a tick's worth of codec frames. Payloads above the Link's frame
/// limit are split; the receiving decoder reassembles codec frames across
/// Link frames.
fn send_payload(link: &Link, channel: ChannelId, payload: &[u8]) -> Result<usize, LinkError> {
    let chunk_size = usize::try_from(link.config().max_frame_bytes)
        .unwrap_or(usize::MAX)
        .max(1);
    let mut queued = 0;
    for chunk in payload.chunks(chunk_size) {
        queued += link.send(channel, chunk)?;
    }
    Ok(queued)
}
