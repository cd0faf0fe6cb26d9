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

use serde::{Deserialize, Serialize};

/// Read-only view of the user's capture preferences. Queried at connect time
/// and on every camera toggle; the store itself is owned by the host
/// application.
pub trait VoiceSettings: Send + Sync {
    fn preferred_audio_input(&self) -> Option<String>;

    fn preferred_video_input(&self) -> Option<String>;

    fn preferred_audio_output(&self) -> Option<String>;

    fn echo_cancellation(&self) -> bool;

    fn noise_suppression(&self) -> bool;
}

/// Plain value carrier for capture preferences, for hosts that persist them
/// as part of their own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub preferred_audio_input: Option<String>,
    pub preferred_video_input: Option<String>,
    pub preferred_audio_output: Option<String>,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            preferred_audio_input: None,
            preferred_video_input: None,
            preferred_audio_output: None,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

impl VoiceSettings for CaptureSettings {
    fn preferred_audio_input(&self) -> Option<String> {
        self.preferred_audio_input.clone()
    }

    fn preferred_video_input(&self) -> Option<String> {
        self.preferred_video_input.clone()
    }

    fn preferred_audio_output(&self) -> Option<String> {
        self.preferred_audio_output.clone()
    }

    fn echo_cancellation(&self) -> bool {
        self.echo_cancellation
    }

    fn noise_suppression(&self) -> bool {
        self.noise_suppression
    }
}
