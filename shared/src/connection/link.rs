use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use log::{info, warn};

use syncnet_serde::{ByteReader, ByteWrite, ByteWriter, Serde};

use crate::{
    connection::{error::LinkError, link_config::LinkConfig, transport::Transport},
    types::{ChannelId, LinkId},
};

/// channel u8 + length u32
const LINK_HEADER_BYTES: usize = 5;

static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

struct LinkInner {
    transport: Option<Box<dyn Transport>>,
    incoming: Vec<u8>,
    channels: HashMap<ChannelId, VecDeque<Vec<u8>>>,
    local_shutdown: bool,
    unusable: Option<String>,
}

/// A framed, ordered message channel over one Transport.
///
/// Payloads are wrapped as `channel u8 | length u32 | payload` so several
/// consumers can share the same byte stream. A Link is shared as
/// `Arc<Link>`; its buffers sit behind a lock so the Transport may be
/// serviced from another thread.
pub struct Link {
    id: LinkId,
    config: LinkConfig,
    inner: Mutex<LinkInner>,
}

impl Link {
    /// Creates a Link with no Transport. It reports disconnected until
    /// `set_transport` is called.
    pub fn new(config: LinkConfig) -> Self {
        Self {
            id: LinkId::new(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed)),
            config,
            inner: Mutex::new(LinkInner {
                transport: None,
                incoming: Vec::new(),
                channels: HashMap::new(),
                local_shutdown: false,
                unusable: None,
            }),
        }
    }

    pub fn with_transport(config: LinkConfig, transport: Box<dyn Transport>) -> Self {
        let link = Self::new(config);
        link.set_transport(transport);
        link
    }

    /// Binds a Transport, replacing any previous one. Bytes buffered from
    /// the previous Transport are discarded.
    pub fn set_transport(&self, transport: Box<dyn Transport>) {
        let mut inner = self.lock();
        inner.transport = Some(transport);
        inner.incoming.clear();
        inner.channels.clear();
        inner.local_shutdown = false;
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// False once the Link is unusable, was shut down, lost its Transport, or
    /// the peer closed its side
    pub fn is_connected(&self) -> bool {
        let inner = self.lock();
        if inner.unusable.is_some() || inner.local_shutdown {
            return false;
        }
        match &inner.transport {
            Some(transport) => transport.is_connected() && !transport.remote_has_shutdown(),
            None => false,
        }
    }

    /// Half-closes the Link. Queued bytes still drain; no further sends are
    /// accepted.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.local_shutdown {
            return;
        }
        inner.local_shutdown = true;
        if let Some(transport) = inner.transport.as_mut() {
            transport.shutdown();
        }
        info!("{} shut down", self.id);
    }

    pub fn remote_has_shutdown(&self) -> bool {
        let inner = self.lock();
        inner
            .transport
            .as_ref()
            .is_some_and(|transport| transport.remote_has_shutdown())
    }

    pub fn bytes_queued_to_send(&self) -> usize {
        let inner = self.lock();
        inner
            .transport
            .as_ref()
            .map_or(0, |transport| transport.bytes_queued_to_send())
    }

    /// Flags the Link as permanently unusable. The first reason wins.
    pub fn mark_unusable(&self, reason: impl Into<String>) {
        let mut inner = self.lock();
        Self::mark_unusable_locked(self.id, &mut inner, reason.into());
    }

    pub fn unusable_reason(&self) -> Option<String> {
        self.lock().unusable.clone()
    }

    /// Frames `payload` on `channel` and hands it to the Transport.
    /// Returns the number of bytes queued, header included.
    ///
    /// A Transport that accepts only part of a frame has desynchronized the
    /// stream, so the Link is marked unusable.
    pub fn send(&self, channel: ChannelId, payload: &[u8]) -> Result<usize, LinkError> {
        let mut inner = self.lock();
        Self::check_usable(&inner)?;
        if inner.local_shutdown {
            return Err(LinkError::NotConnected);
        }

        let length = match u32::try_from(payload.len()) {
            Ok(length) if length <= self.config.max_frame_bytes => length,
            _ => {
                return Err(LinkError::FrameTooLarge {
                    length: payload.len(),
                    max: self.config.max_frame_bytes,
                })
            }
        };

        let mut writer = ByteWriter::with_capacity(LINK_HEADER_BYTES + payload.len());
        channel.ser(&mut writer);
        length.ser(&mut writer);
        writer.write_bytes(payload);
        let frame = writer.to_bytes();

        let queued = {
            let Some(transport) = inner.transport.as_mut() else {
                return Err(LinkError::NoTransport);
            };
            if !transport.is_connected() {
                return Err(LinkError::NotConnected);
            }
            transport.send(&frame)
        };

        if queued < frame.len() {
            let reason = format!("transport accepted {} of {} bytes", queued, frame.len());
            Self::mark_unusable_locked(self.id, &mut inner, reason.clone());
            return Err(LinkError::Unusable { reason });
        }
        Ok(queued)
    }

    /// Returns every complete payload received on `channel`, in arrival
    /// order. Payloads for other channels stay queued for their own
    /// consumers.
    ///
    /// Bytes keep draining after the peer has shut down so in-flight frames
    /// are not lost.
    pub fn receive(&self, channel: ChannelId) -> Result<Vec<Vec<u8>>, LinkError> {
        let mut inner = self.lock();
        Self::check_usable(&inner)?;

        let received = match inner.transport.as_mut() {
            Some(transport) => transport.receive_available(),
            None => return Err(LinkError::NoTransport),
        };
        inner.incoming.extend_from_slice(&received);

        self.split_frames(&mut inner)?;

        Ok(inner
            .channels
            .get_mut(&channel)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default())
    }

    fn split_frames(&self, inner: &mut LinkInner) -> Result<(), LinkError> {
        let mut consumed = 0;
        loop {
            let pending = &inner.incoming[consumed..];
            if pending.len() < LINK_HEADER_BYTES {
                break;
            }

            let mut reader = ByteReader::new(pending);
            let (Ok(channel), Ok(length)) = (u8::de(&mut reader), u32::de(&mut reader)) else {
                break;
            };

            if length > self.config.max_frame_bytes {
                let error = LinkError::FrameTooLarge {
                    length: length as usize,
                    max: self.config.max_frame_bytes,
                };
                inner.incoming.clear();
                Self::mark_unusable_locked(self.id, inner, error.to_string());
                return Err(error);
            }

            let frame_end = LINK_HEADER_BYTES + length as usize;
            if pending.len() < frame_end {
                break;
            }

            let payload = pending[LINK_HEADER_BYTES..frame_end].to_vec();
            inner.channels.entry(channel).or_default().push_back(payload);
            consumed += frame_end;
        }
        inner.incoming.drain(..consumed);
        Ok(())
    }

    fn check_usable(inner: &LinkInner) -> Result<(), LinkError> {
        match &inner.unusable {
            Some(reason) => Err(LinkError::Unusable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn mark_unusable_locked(id: LinkId, inner: &mut LinkInner, reason: String) {
        if inner.unusable.is_some() {
            return;
        }
        warn!("{} marked unusable: {}", id, reason);
        inner.unusable = Some(reason);
    }

    fn lock(&self) -> MutexGuard<'_, LinkInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
