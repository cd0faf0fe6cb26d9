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

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use voice_session::prelude::*;
use voice_session::Dispatcher;

pub const LOCAL_IDENTITY: &str = "local-user";

pub struct FakeEngine {
    pub rooms: Mutex<Vec<Arc<FakeRoom>>>,
    /// Dimension reported by the next camera probe; `None` makes the probe
    /// fail outright.
    pub probe: Mutex<Option<TrackDimension>>,
    pub probe_stopped: Arc<AtomicBool>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rooms: Mutex::new(Vec::new()),
            probe: Mutex::new(Some(TrackDimension(640, 360))),
            probe_stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn room(&self, index: usize) -> Arc<FakeRoom> {
        self.rooms.lock()[index].clone()
    }

    pub fn last_room(&self) -> Arc<FakeRoom> {
        self.rooms.lock().last().expect("no room created").clone()
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    fn create_room(&self, options: RoomOptions) -> Arc<dyn Room> {
        let room = Arc::new(FakeRoom::new(options));
        self.rooms.lock().push(room.clone());
        room
    }

    async fn open_camera_probe(
        &self,
        _device_id: Option<&str>,
    ) -> EngineResult<Box<dyn CaptureProbe>> {
        match *self.probe.lock() {
            Some(dimension) => {
                Ok(Box::new(FakeProbe { dimension, stopped: self.probe_stopped.clone() }))
            }
            None => Err(EngineError::Device("no camera available".into())),
        }
    }
}

pub struct FakeProbe {
    dimension: TrackDimension,
    stopped: Arc<AtomicBool>,
}

impl CaptureProbe for FakeProbe {
    fn dimension(&self) -> TrackDimension {
        self.dimension
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

pub struct FakeRoom {
    pub options: RoomOptions,
    pub local: Arc<FakeLocalParticipant>,
    pub remotes: Mutex<Vec<Arc<FakeRemoteParticipant>>>,
    pub events: Dispatcher<RoomEvent>,
    pub connected_with: Mutex<Option<(String, String, ConnectOptions)>>,
    pub disconnects: AtomicUsize,
}

impl FakeRoom {
    pub fn new(options: RoomOptions) -> Self {
        Self {
            options,
            local: Arc::new(FakeLocalParticipant::new(LOCAL_IDENTITY)),
            remotes: Mutex::new(Vec::new()),
            events: Dispatcher::default(),
            connected_with: Mutex::new(None),
            disconnects: AtomicUsize::new(0),
        }
    }

    pub fn emit(&self, event: RoomEvent) {
        self.events.dispatch(&event);
    }

    pub fn add_remote(&self, participant: Arc<FakeRemoteParticipant>) {
        self.remotes.lock().push(participant);
    }
}

#[async_trait]
impl Room for FakeRoom {
    async fn connect(&self, url: &str, token: &str, options: ConnectOptions) -> EngineResult<()> {
        *self.connected_with.lock() = Some((url.to_owned(), token.to_owned(), options));
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn register_observer(&self) -> RoomEvents {
        self.events.register()
    }

    fn local_participant(&self) -> Arc<dyn LocalParticipant> {
        self.local.clone()
    }

    fn remote_participants(&self) -> Vec<Arc<dyn RemoteParticipant>> {
        self.remotes.lock().iter().map(|p| p.clone() as Arc<dyn RemoteParticipant>).collect()
    }

    fn remote_participant(
        &self,
        identity: &ParticipantIdentity,
    ) -> Option<Arc<dyn RemoteParticipant>> {
        self.remotes
            .lock()
            .iter()
            .find(|p| &p.identity == identity)
            .map(|p| p.clone() as Arc<dyn RemoteParticipant>)
    }
}

pub struct FakeLocalParticipant {
    pub identity: ParticipantIdentity,
    pub microphone: AtomicBool,
    pub camera: AtomicBool,
    pub screen_share: AtomicBool,
    pub fail_microphone: AtomicBool,
    pub fail_camera: AtomicBool,
    pub microphone_calls: AtomicUsize,
    pub camera_options: Mutex<Option<VideoCaptureOptions>>,
    pub camera_track: Mutex<Option<Arc<FakeLocalTrack>>>,
    pub screen_options: Mutex<Option<ScreenCaptureOptions>>,
    pub published: Mutex<Vec<(TrackSource, TrackPublishOptions)>>,
    /// Interleaved record of constraint and publish calls, for asserting
    /// that caps land before a track goes out.
    pub log: Arc<Mutex<Vec<String>>>,
}

impl FakeLocalParticipant {
    pub fn new(identity: &str) -> Self {
        Self {
            identity: identity.into(),
            microphone: AtomicBool::new(false),
            camera: AtomicBool::new(false),
            screen_share: AtomicBool::new(false),
            fail_microphone: AtomicBool::new(false),
            fail_camera: AtomicBool::new(false),
            microphone_calls: AtomicUsize::new(0),
            camera_options: Mutex::new(None),
            camera_track: Mutex::new(None),
            screen_options: Mutex::new(None),
            published: Mutex::new(Vec::new()),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LocalParticipant for FakeLocalParticipant {
    fn identity(&self) -> ParticipantIdentity {
        self.identity.clone()
    }

    fn is_microphone_enabled(&self) -> bool {
        self.microphone.load(Ordering::SeqCst)
    }

    fn is_camera_enabled(&self) -> bool {
        self.camera.load(Ordering::SeqCst)
    }

    fn is_screen_share_enabled(&self) -> bool {
        self.screen_share.load(Ordering::SeqCst)
    }

    async fn set_microphone_enabled(
        &self,
        enabled: bool,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>> {
        self.microphone_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_microphone.load(Ordering::SeqCst) {
            return Err(EngineError::Publish("microphone unavailable".into()));
        }

        self.microphone.store(enabled, Ordering::SeqCst);
        if enabled {
            let track = Arc::new(FakeLocalTrack::new(
                TrackKind::Audio,
                TrackSource::Microphone,
                self.log.clone(),
            ));
            Ok(Some(Arc::new(FakeLocalPublication {
                source: TrackSource::Microphone,
                kind: TrackKind::Audio,
                track: Some(track),
            })))
        } else {
            Ok(None)
        }
    }

    async fn set_camera_enabled(
        &self,
        enabled: bool,
        options: Option<VideoCaptureOptions>,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>> {
        if self.fail_camera.load(Ordering::SeqCst) {
            return Err(EngineError::Publish("camera rejected".into()));
        }

        *self.camera_options.lock() = options;
        self.camera.store(enabled, Ordering::SeqCst);
        if enabled {
            let track = Arc::new(FakeLocalTrack::new(
                TrackKind::Video,
                TrackSource::Camera,
                self.log.clone(),
            ));
            *self.camera_track.lock() = Some(track.clone());
            Ok(Some(Arc::new(FakeLocalPublication {
                source: TrackSource::Camera,
                kind: TrackKind::Video,
                track: Some(track),
            })))
        } else {
            Ok(None)
        }
    }

    async fn set_screen_share_enabled(
        &self,
        enabled: bool,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>> {
        self.screen_share.store(enabled, Ordering::SeqCst);
        Ok(None)
    }

    async fn create_screen_tracks(
        &self,
        options: ScreenCaptureOptions,
    ) -> EngineResult<Vec<Arc<dyn LocalTrack>>> {
        *self.screen_options.lock() = Some(options);
        Ok(vec![
            Arc::new(FakeLocalTrack::new(
                TrackKind::Video,
                TrackSource::Screenshare,
                self.log.clone(),
            )),
            Arc::new(FakeLocalTrack::new(
                TrackKind::Audio,
                TrackSource::ScreenshareAudio,
                self.log.clone(),
            )),
        ])
    }

    async fn publish_track(
        &self,
        track: Arc<dyn LocalTrack>,
        options: TrackPublishOptions,
    ) -> EngineResult<Arc<dyn LocalTrackPublication>> {
        self.log.lock().push(format!("publish:{:?}", track.kind()));
        self.published.lock().push((track.source(), options));
        if track.source() == TrackSource::Screenshare {
            self.screen_share.store(true, Ordering::SeqCst);
        }

        Ok(Arc::new(FakeLocalPublication {
            source: track.source(),
            kind: track.kind(),
            track: None,
        }))
    }
}

pub struct FakeLocalTrack {
    kind: TrackKind,
    source: TrackSource,
    pub constraints: Mutex<Option<TrackConstraints>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeLocalTrack {
    pub fn new(kind: TrackKind, source: TrackSource, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { kind, source, constraints: Mutex::new(None), log }
    }
}

#[async_trait]
impl LocalTrack for FakeLocalTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn source(&self) -> TrackSource {
        self.source
    }

    async fn apply_constraints(&self, constraints: TrackConstraints) -> EngineResult<()> {
        self.log.lock().push(format!("constrain:{:?}", self.kind));
        *self.constraints.lock() = Some(constraints);
        Ok(())
    }
}

pub struct FakeLocalPublication {
    pub source: TrackSource,
    pub kind: TrackKind,
    pub track: Option<Arc<FakeLocalTrack>>,
}

impl LocalTrackPublication for FakeLocalPublication {
    fn sid(&self) -> TrackSid {
        TrackSid(format!("TR_{:?}", self.source))
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn source(&self) -> TrackSource {
        self.source
    }

    fn track(&self) -> Option<Arc<dyn LocalTrack>> {
        self.track.clone().map(|track| track as Arc<dyn LocalTrack>)
    }
}

pub struct FakeRemoteParticipant {
    pub identity: ParticipantIdentity,
    pub publications: Mutex<Vec<Arc<FakeRemotePublication>>>,
}

impl FakeRemoteParticipant {
    pub fn new(identity: &str) -> Arc<Self> {
        Arc::new(Self { identity: identity.into(), publications: Mutex::new(Vec::new()) })
    }

    pub fn publish(
        &self,
        sid: &str,
        kind: TrackKind,
        source: TrackSource,
        subscribed: bool,
    ) -> Arc<FakeRemotePublication> {
        let publication = Arc::new(FakeRemotePublication {
            sid: sid.into(),
            kind,
            source,
            subscribed: AtomicBool::new(subscribed),
            subscribe_calls: AtomicUsize::new(0),
        });
        self.publications.lock().push(publication.clone());
        publication
    }
}

impl RemoteParticipant for FakeRemoteParticipant {
    fn identity(&self) -> ParticipantIdentity {
        self.identity.clone()
    }

    fn track_publications(&self) -> Vec<Arc<dyn RemoteTrackPublication>> {
        self.publications
            .lock()
            .iter()
            .map(|p| p.clone() as Arc<dyn RemoteTrackPublication>)
            .collect()
    }
}

pub struct FakeRemotePublication {
    pub sid: TrackSid,
    pub kind: TrackKind,
    pub source: TrackSource,
    pub subscribed: AtomicBool,
    pub subscribe_calls: AtomicUsize,
}

impl RemoteTrackPublication for FakeRemotePublication {
    fn sid(&self) -> TrackSid {
        self.sid.clone()
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn source(&self) -> TrackSource {
        self.source
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    fn set_subscribed(&self, subscribed: bool) {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.subscribed.store(subscribed, Ordering::SeqCst);
    }
}

pub struct FakeChannel {
    pub id: ChannelId,
    pub permissions: Mutex<HashSet<Permission>>,
    pub join_calls: Mutex<Vec<String>>,
    pub auth: JoinAuth,
    pub fail_join: AtomicBool,
}

impl FakeChannel {
    pub fn new(id: &str, permissions: &[Permission]) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            permissions: Mutex::new(permissions.iter().copied().collect()),
            join_calls: Mutex::new(Vec::new()),
            auth: JoinAuth {
                url: "wss://call.example.com".to_owned(),
                token: "join-token".to_owned(),
            },
            fail_join: AtomicBool::new(false),
        })
    }

    pub fn grant(&self, permission: Permission) {
        self.permissions.lock().insert(permission);
    }

    pub fn revoke(&self, permission: Permission) {
        self.permissions.lock().remove(&permission);
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn id(&self) -> ChannelId {
        self.id.clone()
    }

    fn have_permission(&self, permission: Permission) -> bool {
        self.permissions.lock().contains(&permission)
    }

    async fn join_call(&self, region: &str) -> Result<JoinAuth, ChannelError> {
        self.join_calls.lock().push(region.to_owned());
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(ChannelError::Join("no call node available".into()));
        }
        Ok(self.auth.clone())
    }
}

pub fn new_session() -> (VoiceSession, Arc<FakeEngine>) {
    let engine = FakeEngine::new();
    let session = VoiceSession::new(engine.clone(), Arc::new(CaptureSettings::default()));
    (session, engine)
}

/// Drain the state stream until a snapshot matches, or fail after a timeout.
pub async fn wait_for_state(
    rx: &mut mpsc::UnboundedReceiver<SessionState>,
    predicate: impl Fn(&SessionState) -> bool,
) -> SessionState {
    timeout(Duration::from_secs(5), async {
        loop {
            let state = rx.recv().await.expect("state stream closed");
            if predicate(&state) {
                return state;
            }
        }
    })
    .await
    .expect("timed out waiting for session state")
}

/// Poll a condition that is satisfied by a background task, without a state
/// snapshot to wait on.
pub async fn wait_until(condition: impl Fn() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !condition() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
