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

use crate::engine::TrackSource;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VideoCodec {
    VP8,
    H264,
    VP9,
    AV1,
}

impl VideoCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::VP8 => "vp8",
            VideoCodec::H264 => "h264",
            VideoCodec::VP9 => "vp9",
            VideoCodec::AV1 => "av1",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoResolution {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub aspect_ratio: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoEncoding {
    pub max_bitrate: u64,
    pub max_framerate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPreset {
    pub width: u32,
    pub height: u32,
    pub encoding: VideoEncoding,
}

impl VideoPreset {
    pub const fn new(width: u32, height: u32, max_bitrate: u64, max_framerate: f64) -> Self {
        Self { width, height, encoding: VideoEncoding { max_bitrate, max_framerate } }
    }

    pub fn resolution(&self) -> VideoResolution {
        VideoResolution {
            width: self.width,
            height: self.height,
            frame_rate: self.encoding.max_framerate,
            aspect_ratio: self.width as f32 / self.height as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioCaptureOptions {
    pub device_id: Option<String>,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for AudioCaptureOptions {
    fn default() -> Self {
        Self { device_id: None, echo_cancellation: true, noise_suppression: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VideoCaptureOptions {
    pub device_id: Option<String>,
    pub resolution: Option<VideoResolution>,
}

#[derive(Debug, Clone, Default)]
pub struct AudioOutputOptions {
    pub device_id: Option<String>,
}

/// Capture options for screen shares. The capturing surface itself is
/// excluded from the picker so a share cannot recursively capture the call
/// window.
#[derive(Debug, Clone)]
pub struct ScreenCaptureOptions {
    pub audio: bool,
    pub exclude_current_surface: bool,
    pub resolution: VideoResolution,
}

impl Default for ScreenCaptureOptions {
    fn default() -> Self {
        Self {
            audio: true,
            exclude_current_surface: true,
            resolution: screenshare::CAPTURE.resolution(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackPublishOptions {
    // If the encoding isn't set, the engine computes the most appropriate one
    pub video_encoding: Option<VideoEncoding>,
    pub video_codec: VideoCodec,
    pub simulcast: bool,
    pub screen_share_encoding: Option<VideoEncoding>,
    pub source: TrackSource,
}

impl Default for TrackPublishOptions {
    fn default() -> Self {
        Self {
            video_encoding: None,
            video_codec: VideoCodec::VP8,
            simulcast: true,
            screen_share_encoding: None,
            source: TrackSource::Unknown,
        }
    }
}

/// Capture and publish defaults handed to the engine when a room handle is
/// created.
#[derive(Debug, Clone, Default)]
pub struct RoomOptions {
    pub audio_capture: AudioCaptureOptions,
    pub video_capture: VideoCaptureOptions,
    pub audio_output: AudioOutputOptions,
    pub screen_capture: ScreenCaptureOptions,
    pub publish_defaults: TrackPublishOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub auto_subscribe: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { auto_subscribe: true }
    }
}

pub mod camera {
    use super::VideoPreset;

    /// Fixed target for published camera tracks. The width/height act as a
    /// capture hint at publish time and as a hard cap afterwards.
    pub const CAPTURE: VideoPreset = VideoPreset::new(640, 360, 450_000, 30.0);
}

pub mod screenshare {
    use super::{VideoEncoding, VideoPreset};

    /// Hard capture bound for screen shares. The media server rejects offers
    /// above this resolution, so the bound must hold before publishing.
    pub const CAPTURE: VideoPreset = VideoPreset::new(1152, 648, 3_000_000, 15.0);

    pub const ENCODING: VideoEncoding =
        VideoEncoding { max_bitrate: 3_000_000, max_framerate: 15.0 };
}
