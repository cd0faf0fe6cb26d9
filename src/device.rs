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

//! Capture device policy: probe validation and hard constraint enforcement.
//!
//! Capture hints handed to the engine are advisory; devices may still open at
//! their native format. The helpers here validate a device before publishing
//! and clamp live tracks afterwards.

use log::debug;
use thiserror::Error;

use crate::engine::{
    EngineError, EngineResult, LocalTrack, MediaEngine, TrackConstraints, TrackDimension,
};
use crate::options::VideoPreset;

/// Accepted landscape band for camera captures. The media server's admission
/// policy rejects tracks outside these bounds.
pub const MIN_CAMERA_ASPECT: f64 = 0.5;
pub const MAX_CAMERA_ASPECT: f64 = 3.0;

pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to probe capture device: {0}")]
    Probe(#[source] EngineError),
    #[error("camera aspect ratio {0:.2} is not supported")]
    UnsupportedAspectRatio(f64),
}

/// Open the requested camera, read its native format and release it again,
/// then validate the format against the accepted band. The probe is stopped
/// in every path, including rejection.
pub async fn probe_camera(
    engine: &dyn MediaEngine,
    device_id: Option<&str>,
) -> DeviceResult<TrackDimension> {
    let probe = engine.open_camera_probe(device_id).await.map_err(DeviceError::Probe)?;
    let dimension = probe.dimension();
    probe.stop();

    debug!("camera probe reported {}x{}", dimension.0, dimension.1);
    validate_aspect_ratio(dimension)?;
    Ok(dimension)
}

/// Accept ratios in [0.5, 3.0]; extreme or portrait formats are rejected.
/// A probe that reports no dimensions skips validation.
pub fn validate_aspect_ratio(dimension: TrackDimension) -> DeviceResult<()> {
    let TrackDimension(width, height) = dimension;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let ratio = width as f64 / height as f64;
    if !(MIN_CAMERA_ASPECT..=MAX_CAMERA_ASPECT).contains(&ratio) {
        return Err(DeviceError::UnsupportedAspectRatio(ratio));
    }
    Ok(())
}

/// Hard upper bounds for a capture preset.
pub fn max_constraints(preset: &VideoPreset) -> TrackConstraints {
    TrackConstraints {
        max_width: Some(preset.width),
        max_height: Some(preset.height),
        max_frame_rate: Some(preset.encoding.max_framerate),
    }
}

/// Clamp a live track to a preset's envelope.
pub async fn clamp_track(track: &dyn LocalTrack, preset: &VideoPreset) -> EngineResult<()> {
    track.apply_constraints(max_constraints(preset)).await
}
