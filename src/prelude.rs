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

pub use crate::channel::{Channel, ChannelError, JoinAuth, Permission, DEFAULT_CALL_REGION};

pub use crate::device::{DeviceError, DeviceResult};

pub use crate::engine::{
    CaptureProbe, EngineError, EngineResult, LocalParticipant, LocalTrack, LocalTrackPublication,
    MediaEngine, RemoteParticipant, RemoteTrackPublication, Room, RoomEmitter, RoomEvent,
    RoomEvents, TrackConstraints, TrackDimension, TrackKind, TrackSource,
};

pub use crate::id::{ChannelId, ParticipantIdentity, TrackSid};

pub use crate::options::{
    AudioCaptureOptions, AudioOutputOptions, ConnectOptions, RoomOptions, ScreenCaptureOptions,
    TrackPublishOptions, VideoCaptureOptions, VideoCodec, VideoEncoding, VideoPreset,
    VideoResolution,
};

pub use crate::session::{
    ConnectionState, SessionError, SessionResult, SessionState, VoiceSession,
};

pub use crate::settings::{CaptureSettings, VoiceSettings};

pub use crate::subscription::SubscriptionManager;
