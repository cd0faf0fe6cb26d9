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

use std::sync::Arc;

use async_trait::async_trait;

use super::{EngineResult, LocalTrack, LocalTrackPublication, RemoteTrackPublication};
use crate::id::ParticipantIdentity;
use crate::options::{ScreenCaptureOptions, TrackPublishOptions, VideoCaptureOptions};

/// The engine's view of ourselves: capability toggles and explicit track
/// publishing. `set_*_enabled(true)` resolves to the resulting publication,
/// or `None` when the engine declined without an error.
#[async_trait]
pub trait LocalParticipant: Send + Sync {
    fn identity(&self) -> ParticipantIdentity;

    fn is_microphone_enabled(&self) -> bool;

    fn is_camera_enabled(&self) -> bool;

    fn is_screen_share_enabled(&self) -> bool;

    async fn set_microphone_enabled(
        &self,
        enabled: bool,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>>;

    async fn set_camera_enabled(
        &self,
        enabled: bool,
        options: Option<VideoCaptureOptions>,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>>;

    async fn set_screen_share_enabled(
        &self,
        enabled: bool,
    ) -> EngineResult<Option<Arc<dyn LocalTrackPublication>>>;

    /// Create screen capture tracks without publishing them, so constraints
    /// can land on the raw tracks first.
    async fn create_screen_tracks(
        &self,
        options: ScreenCaptureOptions,
    ) -> EngineResult<Vec<Arc<dyn LocalTrack>>>;

    async fn publish_track(
        &self,
        track: Arc<dyn LocalTrack>,
        options: TrackPublishOptions,
    ) -> EngineResult<Arc<dyn LocalTrackPublication>>;
}

pub trait RemoteParticipant: Send + Sync {
    fn identity(&self) -> ParticipantIdentity;

    fn track_publications(&self) -> Vec<Arc<dyn RemoteTrackPublication>>;
}
