// Copyright 2025 LiveKit, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contract for the external real-time media engine.
//!
//! The engine owns signaling, transport, and the participant/track objects;
//! this crate only drives it through the traits below and reacts to its
//! [`RoomEvent`] stream. Every handle is held by reference — nothing here
//! copies or outlives engine state.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::id::ParticipantIdentity;
use crate::options::{ConnectOptions, RoomOptions};

mod participant;
mod publication;
mod track;

pub use participant::*;
pub use publication::*;
pub use track::*;

pub type RoomEvents = mpsc::UnboundedReceiver<RoomEvent>;
pub type RoomEmitter = mpsc::UnboundedSender<RoomEvent>;
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("track publish rejected: {0}")]
    Publish(String),
    #[error("capture device failure: {0}")]
    Device(String),
    #[error("engine failure: {0}")]
    Internal(String),
}

/// Lifecycle and track events emitted by an engine room handle.
#[derive(Clone, Debug)]
pub enum RoomEvent {
    Connected,
    Disconnected,
    Reconnecting,
    Reconnected,
    /// A local publication was removed, whether by us or by the engine
    /// (device lost, server-side unpublish).
    LocalTrackUnpublished { source: TrackSource },
    TrackPublished { participant: ParticipantIdentity },
    TrackUnpublished { participant: ParticipantIdentity },
}

/// Entry point into the media engine: creates room handles and opens
/// short-lived capture probes (the `getUserMedia` equivalent).
#[async_trait]
pub trait MediaEngine: Send + Sync {
    fn create_room(&self, options: RoomOptions) -> Arc<dyn Room>;

    async fn open_camera_probe(
        &self,
        device_id: Option<&str>,
    ) -> EngineResult<Box<dyn CaptureProbe>>;
}

/// One engine room. A handle is created unconnected, connected at most once
/// and discarded after `disconnect`.
#[async_trait]
pub trait Room: Send + Sync {
    async fn connect(&self, url: &str, token: &str, options: ConnectOptions) -> EngineResult<()>;

    async fn disconnect(&self);

    /// Register a receiver for this room's events. The receiver is
    /// deregistered by dropping it.
    fn register_observer(&self) -> RoomEvents;

    fn local_participant(&self) -> Arc<dyn LocalParticipant>;

    fn remote_participants(&self) -> Vec<Arc<dyn RemoteParticipant>>;

    fn remote_participant(
        &self,
        identity: &ParticipantIdentity,
    ) -> Option<Arc<dyn RemoteParticipant>>;
}
