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

use async_trait::async_trait;

use super::EngineResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    Unknown,
    Camera,
    Microphone,
    Screenshare,
    ScreenshareAudio,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackDimension(pub u32, pub u32);

/// Hard upper bounds applied to a live capture track. Unlike the resolution
/// hints in capture options, these are enforced by the device pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackConstraints {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_frame_rate: Option<f64>,
}

/// A locally captured track, created but not necessarily published yet.
#[async_trait]
pub trait LocalTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    fn source(&self) -> TrackSource;

    async fn apply_constraints(&self, constraints: TrackConstraints) -> EngineResult<()>;
}

/// A short-lived capture stream opened to inspect a device's native format.
/// Must be stopped by the acquiring operation; it never outlives it.
pub trait CaptureProbe: Send {
    fn dimension(&self) -> TrackDimension;

    fn stop(&self);
}
