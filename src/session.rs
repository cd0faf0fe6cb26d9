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

use std::collections::HashSet;
use std::sync::Arc;

use log::error;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::channel::{Channel, ChannelError, JoinAuth, Permission, DEFAULT_CALL_REGION};
use crate::device::{self, DeviceError};
use crate::engine::{
    EngineError, MediaEngine, RemoteParticipant, Room, RoomEvent, RoomEvents, TrackKind,
    TrackSource,
};
use crate::id::{ChannelId, ParticipantIdentity};
use crate::observer::Dispatcher;
use crate::options::{
    camera, screenshare, AudioCaptureOptions, AudioOutputOptions, ConnectOptions, RoomOptions,
    ScreenCaptureOptions, TrackPublishOptions, VideoCaptureOptions, VideoCodec,
};
use crate::settings::VoiceSettings;
use crate::subscription::SubscriptionManager;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no active call session")]
    InvalidState,
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Ready,
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
}

/// Observable session state. Always published as a whole snapshot so
/// consumers never see a torn combination of connection state and capability
/// flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub connection: ConnectionState,
    pub channel: Option<ChannelId>,
    pub microphone: bool,
    pub camera: bool,
    pub screenshare: bool,
    pub deafened: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            connection: ConnectionState::Ready,
            channel: None,
            microphone: false,
            camera: false,
            screenshare: false,
            deafened: false,
        }
    }
}

struct ActiveCall {
    room: Arc<dyn Room>,
    channel: Arc<dyn Channel>,
    subscriptions: Arc<SubscriptionManager>,
    event_task: JoinHandle<()>,
    close_tx: oneshot::Sender<()>,
}

struct SessionInner {
    engine: Arc<dyn MediaEngine>,
    settings: Arc<dyn VoiceSettings>,
    state: RwLock<SessionState>,
    dispatcher: Dispatcher<SessionState>,
    active: Mutex<Option<ActiveCall>>,
}

/// Controller for one voice/video call bound to a chat channel.
///
/// Owns the engine room handle exclusively: `connect` replaces it and
/// `disconnect` releases it. Connection state only moves on engine lifecycle
/// events and on the explicit connect/disconnect calls; capability flags
/// mirror the engine's local publication state and are resynchronized from
/// it whenever the engine may have changed independently.
///
/// The handle is cheaply cloneable and shares one underlying session.
#[derive(Clone)]
pub struct VoiceSession {
    inner: Arc<SessionInner>,
}

impl VoiceSession {
    pub fn new(engine: Arc<dyn MediaEngine>, settings: Arc<dyn VoiceSettings>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                engine,
                settings,
                state: RwLock::new(SessionState::default()),
                dispatcher: Dispatcher::default(),
                active: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    /// Register a state observer. Every received value is a complete
    /// snapshot; related fields never arrive split across updates.
    pub fn watch(&self) -> mpsc::UnboundedReceiver<SessionState> {
        self.inner.dispatcher.register()
    }

    pub fn room(&self) -> Option<Arc<dyn Room>> {
        self.inner.active.lock().as_ref().map(|active| active.room.clone())
    }

    pub fn channel(&self) -> Option<Arc<dyn Channel>> {
        self.inner.active.lock().as_ref().map(|active| active.channel.clone())
    }

    pub fn connected_user(
        &self,
        identity: &ParticipantIdentity,
    ) -> Option<Arc<dyn RemoteParticipant>> {
        self.room().and_then(|room| room.remote_participant(identity))
    }

    // Permission predicates are evaluated against the live channel on every
    // call; grants can change while a call is active, so they are never
    // cached across an await.

    pub fn listen_permission(&self) -> bool {
        self.has_permission(Permission::Listen)
    }

    pub fn speaking_permission(&self) -> bool {
        self.has_permission(Permission::Speak)
    }

    pub fn video_permission(&self) -> bool {
        self.has_permission(Permission::Video)
    }

    /// Screen shares are covered by the `Video` permission scope.
    pub fn screenshare_permission(&self) -> bool {
        self.has_permission(Permission::Video)
    }

    fn has_permission(&self, permission: Permission) -> bool {
        self.channel().map_or(false, |channel| channel.have_permission(permission))
    }

    /// Forward a new visibility set to the subscription manager. `None`
    /// subscribes to every remote video track.
    pub fn set_visible(&self, visible: Option<HashSet<ParticipantIdentity>>) {
        let subscriptions =
            self.inner.active.lock().as_ref().map(|active| active.subscriptions.clone());
        if let Some(subscriptions) = subscriptions {
            subscriptions.set_visible(visible);
        }
    }

    /// Join the given channel's call, superseding any current call.
    ///
    /// A fresh engine handle is created with the user's capture preferences
    /// and the fixed publish defaults. When the channel grants `Speak`, the
    /// microphone is enabled eagerly; a failure there is logged and never
    /// aborts the join. Without an explicit credential one is requested from
    /// the channel. Remote tracks are never auto-subscribed; pulling them is
    /// the subscription manager's job.
    pub async fn connect(
        &self,
        channel: Arc<dyn Channel>,
        auth: Option<JoinAuth>,
    ) -> SessionResult<()> {
        self.disconnect().await;

        let room = self.inner.engine.create_room(self.inner.room_options());
        let subscriptions = Arc::new(SubscriptionManager::new(room.clone()));

        let events = room.register_observer();
        let (close_tx, close_rx) = oneshot::channel();
        let event_task = tokio::spawn(self.inner.clone().event_task(
            room.clone(),
            subscriptions.clone(),
            events,
            close_rx,
        ));

        *self.inner.active.lock() = Some(ActiveCall {
            room: room.clone(),
            channel: channel.clone(),
            subscriptions,
            event_task,
            close_tx,
        });
        self.inner.update_state(|state| {
            state.connection = ConnectionState::Connecting;
            state.channel = Some(channel.id());
            state.microphone = false;
            state.camera = false;
            state.screenshare = false;
            state.deafened = false;
        });

        if channel.have_permission(Permission::Speak) {
            let inner = self.inner.clone();
            let room = room.clone();
            tokio::spawn(async move {
                inner.auto_enable_microphone(room).await;
            });
        }

        let auth = match auth {
            Some(auth) => auth,
            None => channel.join_call(DEFAULT_CALL_REGION).await?,
        };

        room.connect(&auth.url, &auth.token, ConnectOptions { auto_subscribe: false }).await?;
        Ok(())
    }

    /// Leave the current call. No-op when idle; safe to call repeatedly and
    /// from any state.
    pub async fn disconnect(&self) {
        let Some(active) = self.inner.active.lock().take() else { return };

        let _ = active.close_tx.send(());
        let _ = active.event_task.await;
        active.room.disconnect().await;

        self.inner.update_state(|state| {
            state.connection = ConnectionState::Ready;
            state.channel = None;
        });
    }

    /// Local-only: deafening does not change any engine subscription or
    /// publication state.
    pub fn toggle_deafen(&self) {
        self.inner.update_state(|state| state.deafened = !state.deafened);
    }

    pub async fn toggle_mute(&self) -> SessionResult<()> {
        let room = self.room().ok_or(SessionError::InvalidState)?;
        let local = room.local_participant();

        local.set_microphone_enabled(!local.is_microphone_enabled()).await?;

        let enabled = local.is_microphone_enabled();
        self.inner.update_state(|state| state.microphone = enabled);
        Ok(())
    }

    /// Toggle the camera. Probe/publish failures are logged and leave the
    /// flag unchanged so the user can retry.
    pub async fn toggle_camera(&self) -> SessionResult<()> {
        let room = self.room().ok_or(SessionError::InvalidState)?;
        if let Err(err) = self.inner.toggle_camera(&room).await {
            error!("camera toggle failed: {err}");
        }
        Ok(())
    }

    /// Toggle screen sharing. Capture/publish failures are logged and leave
    /// the flag unchanged so the user can retry.
    pub async fn toggle_screenshare(&self) -> SessionResult<()> {
        let room = self.room().ok_or(SessionError::InvalidState)?;
        if let Err(err) = self.inner.toggle_screen_share(&room).await {
            error!("screen share toggle failed: {err}");
        }
        Ok(())
    }
}

impl SessionInner {
    /// Apply a mutation and publish the resulting snapshot as one update.
    /// Does nothing if the snapshot is unchanged.
    fn update_state(&self, apply: impl FnOnce(&mut SessionState)) {
        let mut state = self.state.write();
        let previous = state.clone();
        apply(&mut state);
        if *state == previous {
            return;
        }

        let snapshot = state.clone();
        drop(state);
        self.dispatcher.dispatch(&snapshot);
    }

    fn is_current(&self, room: &Arc<dyn Room>) -> bool {
        self.active.lock().as_ref().map_or(false, |active| Arc::ptr_eq(&active.room, room))
    }

    fn room_options(&self) -> RoomOptions {
        RoomOptions {
            audio_capture: AudioCaptureOptions {
                device_id: self.settings.preferred_audio_input(),
                echo_cancellation: self.settings.echo_cancellation(),
                noise_suppression: self.settings.noise_suppression(),
            },
            video_capture: VideoCaptureOptions {
                device_id: self.settings.preferred_video_input(),
                ..Default::default()
            },
            audio_output: AudioOutputOptions { device_id: self.settings.preferred_audio_output() },
            screen_capture: ScreenCaptureOptions::default(),
            publish_defaults: self.publish_defaults(),
        }
    }

    fn publish_defaults(&self) -> TrackPublishOptions {
        TrackPublishOptions {
            simulcast: false,
            video_codec: VideoCodec::VP8,
            screen_share_encoding: Some(screenshare::ENCODING),
            ..Default::default()
        }
    }

    async fn auto_enable_microphone(self: Arc<Self>, room: Arc<dyn Room>) {
        match room.local_participant().set_microphone_enabled(true).await {
            Ok(Some(_)) => {
                // Discard the result if a newer connect superseded this handle.
                if self.is_current(&room) {
                    self.update_state(|state| state.microphone = true);
                }
            }
            Ok(None) => {}
            Err(err) => error!("failed to enable microphone on join: {err}"),
        }
    }

    async fn toggle_camera(&self, room: &Arc<dyn Room>) -> SessionResult<()> {
        let local = room.local_participant();

        if local.is_camera_enabled() {
            local.set_camera_enabled(false, None).await?;
            self.update_state(|state| state.camera = false);
            return Ok(());
        }

        let device_id = self.settings.preferred_video_input();
        device::probe_camera(self.engine.as_ref(), device_id.as_deref()).await?;

        let options = VideoCaptureOptions {
            device_id,
            resolution: Some(camera::CAPTURE.resolution()),
        };
        let publication = local.set_camera_enabled(true, Some(options)).await?;

        // The resolution in the capture options is a hint; the device may
        // still open at a higher native format. Clamp the live track.
        if let Some(track) = publication.as_ref().and_then(|publication| publication.track()) {
            device::clamp_track(track.as_ref(), &camera::CAPTURE).await?;
        }

        let enabled = local.is_camera_enabled();
        self.update_state(|state| state.camera = enabled);
        Ok(())
    }

    async fn toggle_screen_share(&self, room: &Arc<dyn Room>) -> SessionResult<()> {
        let local = room.local_participant();

        if local.is_screen_share_enabled() {
            local.set_screen_share_enabled(false).await?;
            self.update_state(|state| state.screenshare = false);
            return Ok(());
        }

        // Create the tracks explicitly so the hard caps land on the video
        // track before the publish offer is built; the engine's one-shot
        // helper only applies advisory hints on some platforms and the
        // server rejects offers above the bound.
        let tracks = local.create_screen_tracks(ScreenCaptureOptions::default()).await?;

        for track in &tracks {
            if track.kind() == TrackKind::Video {
                device::clamp_track(track.as_ref(), &screenshare::CAPTURE).await?;
            }
        }

        for track in tracks {
            let options = TrackPublishOptions { source: track.source(), ..self.publish_defaults() };
            local.publish_track(track, options).await?;
        }

        let enabled = local.is_screen_share_enabled();
        self.update_state(|state| state.screenshare = enabled);
        Ok(())
    }

    async fn event_task(
        self: Arc<Self>,
        room: Arc<dyn Room>,
        subscriptions: Arc<SubscriptionManager>,
        mut events: RoomEvents,
        mut close_rx: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.on_room_event(&room, &subscriptions, event),
                    None => break,
                },
                _ = &mut close_rx => break,
            }
        }
    }

    fn on_room_event(
        &self,
        room: &Arc<dyn Room>,
        subscriptions: &SubscriptionManager,
        event: RoomEvent,
    ) {
        match event {
            RoomEvent::Connected => {
                self.update_state(|state| state.connection = ConnectionState::Connected);
                subscriptions.sync();
            }
            RoomEvent::Disconnected => {
                // The engine has torn down all local tracks.
                self.update_state(|state| {
                    state.connection = ConnectionState::Disconnected;
                    state.microphone = false;
                    state.camera = false;
                    state.screenshare = false;
                });
            }
            RoomEvent::Reconnecting => {
                self.update_state(|state| state.connection = ConnectionState::Reconnecting);
            }
            RoomEvent::Reconnected => {
                // The engine republishes automatically and may have dropped
                // or restored tracks along the way; its local publication
                // state is authoritative, not our pre-reconnect flags.
                let local = room.local_participant();
                let microphone = local.is_microphone_enabled();
                let camera = local.is_camera_enabled();
                let screenshare = local.is_screen_share_enabled();
                self.update_state(|state| {
                    state.connection = ConnectionState::Connected;
                    state.microphone = microphone;
                    state.camera = camera;
                    state.screenshare = screenshare;
                });
            }
            RoomEvent::LocalTrackUnpublished { source } => {
                self.update_state(|state| match source {
                    TrackSource::Microphone => state.microphone = false,
                    TrackSource::Camera => state.camera = false,
                    TrackSource::Screenshare => state.screenshare = false,
                    _ => {}
                });
            }
            RoomEvent::TrackPublished { .. } | RoomEvent::TrackUnpublished { .. } => {
                subscriptions.sync();
            }
        }
    }
}
