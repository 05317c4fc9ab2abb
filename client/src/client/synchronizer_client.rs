use std::{collections::HashMap, sync::Arc};

use log::{debug, info, warn};

use syncnet_shared::{
    FieldIndex, FieldValue, Link, LinkId, LinkSet, MessageDecoder, ObjectId, ObjectStore,
    Replicate, SyncError, SyncMessage, TypeTag,
};

use super::client_config::ClientConfig;
use crate::{
    events::{ReplicaEvent, ReplicaEvents},
    lifetime_managers::LifetimeManagerRegistry,
};

/// Per-server receive state
struct ServerConnection {
    decoder: MessageDecoder,
}

impl ServerConnection {
    fn new(link: &Link) -> Self {
        Self {
            decoder: MessageDecoder::new(link.config().max_frame_bytes),
        }
    }
}

/// Where a replica came from, needed to destroy it correctly later
struct ReplicaRecord {
    origin: LinkId,
    type_tag: TypeTag,
}

/// The replica side of replication.
///
/// Mirrors the objects one or more servers broadcast. Objects are built and
/// torn down through lifetime managers registered per type tag; applying
/// remote values never marks fields dirty.
pub struct SynchronizerClient {
    config: ClientConfig,
    objects: ObjectStore,
    records: HashMap<ObjectId, ReplicaRecord>,
    servers: LinkSet<ServerConnection>,
    lifetime_managers: LifetimeManagerRegistry,
    events: ReplicaEvents,
}

impl SynchronizerClient {
    pub fn new(config: ClientConfig) -> Self {
        let events = ReplicaEvents::new(config.record_events);
        Self {
            config,
            objects: ObjectStore::new(),
            records: HashMap::new(),
            servers: LinkSet::new(),
            lifetime_managers: LifetimeManagerRegistry::default(),
            events,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registers how to build and release objects of `type_tag`. Must be
    /// called for every type a server may send before its Create arrives;
    /// a Create for an unregistered tag makes that server's Link unusable.
    ///
    /// The destructor receives the object a Destroy removed. Registering a
    /// tag again replaces the earlier managers.
    pub fn set_lifetime_managers<T, F, D>(&mut self, type_tag: TypeTag, mut factory: F, mut destructor: D)
    where
        T: Replicate,
        F: FnMut(ObjectId) -> T + Send + 'static,
        D: FnMut(T) + Send + 'static,
    {
        let replaced = self.lifetime_managers.insert(
            type_tag,
            Box::new(move |object_id: ObjectId| -> Box<dyn Replicate> {
                Box::new(factory(object_id))
            }),
            Box::new(move |object: Box<dyn Replicate>| match object.into_any().downcast::<T>() {
                Ok(object) => destructor(*object),
                Err(_) => warn!("Destructor for type tag {} received an object of another type", type_tag),
            }),
        );
        if replaced {
            debug!("Replaced lifetime managers for type tag {}", type_tag);
        }
    }

    pub fn has_lifetime_managers(&self, type_tag: &TypeTag) -> bool {
        self.lifetime_managers.contains(type_tag)
    }

    // Objects

    pub fn object<T: Replicate>(&self, object_id: &ObjectId) -> Option<&T> {
        self.objects.get_typed::<T>(object_id)
    }

    pub fn has_object(&self, object_id: &ObjectId) -> bool {
        self.objects.contains(object_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &dyn Replicate)> {
        self.objects.iter()
    }

    pub fn objects_of<T: Replicate>(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.objects.iter_typed::<T>()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // Servers

    /// Registers a server Link. Returns false if it is already registered.
    pub fn add_server(&mut self, link: Arc<Link>) -> bool {
        let link_id = link.id();
        let connection = ServerConnection::new(&link);
        let added = self.servers.insert(link, connection);
        if added {
            info!("Server {} added", link_id);
        }
        added
    }

    /// Stops listening to a server. Removing an unknown Link is a no-op.
    pub fn remove_server(&mut self, link_id: &LinkId) -> bool {
        let removed = self.servers.remove(link_id).is_some();
        if removed {
            info!("Server {} removed", link_id);
            self.release_objects_of(link_id);
        }
        removed
    }

    pub fn has_server(&self, link_id: &LinkId) -> bool {
        self.servers.contains(link_id)
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    // Events

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Everything that happened since the previous call, in order. Always
    /// empty unless `ClientConfig::record_events` is set.
    pub fn take_events(&mut self) -> Vec<ReplicaEvent> {
        self.events.take()
    }

    // Tick

    /// Applies everything the servers have sent since the last call, then
    /// drops servers whose Link has disconnected. Never blocks.
    ///
    /// A message that cannot be decoded, or a Create for an unregistered
    /// type tag, makes the sending Link unusable and discards the rest of
    /// its traffic. Schema mismatches and references to missing objects only
    /// drop the offending message.
    pub fn update(&mut self) {
        let channel = self.config.channel;

        let mut inbound = Vec::new();
        for (link, connection) in self.servers.iter_mut() {
            let mut messages = Vec::new();
            let mut failure = None;

            match link.receive(channel) {
                Ok(payloads) => {
                    for payload in &payloads {
                        connection.decoder.push_bytes(payload);
                    }
                    while let Some(result) = connection.decoder.next_message() {
                        match result {
                            Ok(message) => messages.push(message),
                            Err(error) => {
                                failure = Some(SyncError::MalformedMessage(error));
                                break;
                            }
                        }
                    }
                }
                Err(error) => failure = Some(SyncError::Link(error)),
            }

            inbound.push((link.clone(), messages, failure));
        }

        for (link, messages, failure) in inbound {
            let link_id = link.id();
            let mut link_failed = false;

            for message in messages {
                let Err(error) = self.apply_message(link_id, message) else {
                    continue;
                };
                if error.is_link_fatal() {
                    self.fail_link(&link, error);
                    link_failed = true;
                    break;
                }
                warn!("Dropped message from {}: {}", link_id, error);
                self.events.push(ReplicaEvent::Error { link_id, error });
            }

            if let (false, Some(error)) = (link_failed, failure) {
                self.fail_link(&link, error);
            }
        }

        for (link, _) in self.servers.prune_disconnected() {
            let link_id = link.id();
            info!("Server {} disconnected", link_id);
            self.events.push(ReplicaEvent::ServerDisconnected(link_id));
            self.release_objects_of(&link_id);
        }
    }

    fn fail_link(&mut self, link: &Link, error: SyncError) {
        let link_id = link.id();
        warn!("Server {} sent unusable traffic: {}", link_id, error);
        // A Link that already failed on its own does not need a second reason
        if !matches!(error, SyncError::Link(_)) {
            link.mark_unusable(error.to_string());
        }
        self.events.push(ReplicaEvent::Error { link_id, error });
    }

    fn apply_message(&mut self, link_id: LinkId, message: SyncMessage) -> Result<(), SyncError> {
        match message {
            SyncMessage::Create {
                object_id,
                type_tag,
                values,
            } => self.apply_create(link_id, object_id, type_tag, values),
            SyncMessage::Update { object_id, fields } => self.apply_update(object_id, fields),
            SyncMessage::Destroy { object_id } => self.apply_destroy(object_id),
        }
    }

    fn apply_create(
        &mut self,
        link_id: LinkId,
        object_id: ObjectId,
        type_tag: TypeTag,
        values: Vec<FieldValue>,
    ) -> Result<(), SyncError> {
        if self.objects.contains(&object_id) {
            return Err(SyncError::DuplicateObject { object_id });
        }
        let Some(mut object) = self.lifetime_managers.construct(&type_tag, object_id) else {
            return Err(SyncError::UnknownTypeTag { type_tag });
        };

        if let Err(error) = Self::seed_object(object_id, object.as_mut(), values) {
            self.lifetime_managers.destroy(&type_tag, object);
            return Err(error);
        }

        self.objects.insert(object_id, object);
        self.records.insert(
            object_id,
            ReplicaRecord {
                origin: link_id,
                type_tag,
            },
        );
        debug!("Created replica {} of type {}", object_id, type_tag);
        self.events.push(ReplicaEvent::Created {
            object_id,
            type_tag,
        });
        Ok(())
    }

    /// Binds the id and writes the initial values of a freshly built object
    fn seed_object(
        object_id: ObjectId,
        object: &mut dyn Replicate,
        values: Vec<FieldValue>,
    ) -> Result<(), SyncError> {
        match object.object_id() {
            None => object
                .synced_object_mut()
                .assign_id(object_id)
                .map_err(|error| SyncError::from_object_error(object_id, error))?,
            Some(existing) if existing == object_id => {}
            Some(_) => return Err(SyncError::DuplicateObject { object_id }),
        }

        let field_count = object.field_count();
        if values.len() > field_count {
            return Err(SyncError::FieldIndexOutOfRange {
                object_id,
                index: FieldIndex::try_from(field_count).unwrap_or(FieldIndex::MAX),
                field_count,
            });
        }

        let fields: Vec<(FieldIndex, FieldValue)> = (0..=FieldIndex::MAX).zip(values).collect();
        for (index, value) in &fields {
            object
                .validate_remote(*index, value)
                .map_err(|error| SyncError::from_object_error(object_id, error))?;
        }
        for (index, value) in fields {
            object
                .apply_remote(index, value)
                .map_err(|error| SyncError::from_object_error(object_id, error))?;
        }
        Ok(())
    }

    fn apply_update(
        &mut self,
        object_id: ObjectId,
        fields: Vec<(FieldIndex, FieldValue)>,
    ) -> Result<(), SyncError> {
        let Some(object) = self.objects.get_mut(&object_id) else {
            return Err(SyncError::ObjectNotFound { object_id });
        };

        // All or nothing: a bad field drops the whole message
        for (index, value) in &fields {
            object
                .validate_remote(*index, value)
                .map_err(|error| SyncError::from_object_error(object_id, error))?;
        }

        let mut updated = Vec::with_capacity(fields.len());
        for (index, value) in fields {
            object
                .apply_remote(index, value)
                .map_err(|error| SyncError::from_object_error(object_id, error))?;
            updated.push(index);
        }

        self.events.push(ReplicaEvent::Updated {
            object_id,
            fields: updated,
        });
        Ok(())
    }

    fn apply_destroy(&mut self, object_id: ObjectId) -> Result<(), SyncError> {
        let Some(object) = self.objects.remove(&object_id) else {
            return Err(SyncError::ObjectNotFound { object_id });
        };
        let type_tag = match self.records.remove(&object_id) {
            Some(record) => record.type_tag,
            None => object.type_tag(),
        };
        self.lifetime_managers.destroy(&type_tag, object);
        debug!("Destroyed replica {}", object_id);
        self.events.push(ReplicaEvent::Destroyed {
            object_id,
            type_tag,
        });
        Ok(())
    }

    /// Forgets which objects a departed server created, destroying them if
    /// configured to
    fn release_objects_of(&mut self, link_id: &LinkId) {
        let owned: Vec<ObjectId> = self
            .records
            .iter()
            .filter(|(_, record)| record.origin == *link_id)
            .map(|(object_id, _)| *object_id)
            .collect();

        if !self.config.destroy_objects_on_disconnect {
            for object_id in &owned {
                self.records.remove(object_id);
            }
            return;
        }

        for object_id in owned {
            if let Err(error) = self.apply_destroy(object_id) {
                debug!("Replica {} already gone: {}", object_id, error);
            }
        }
    }
}

impl Default for SynchronizerClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}
