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

use super::{LocalTrack, TrackKind, TrackSource};
use crate::id::TrackSid;

pub trait LocalTrackPublication: Send + Sync {
    fn sid(&self) -> TrackSid;

    fn kind(&self) -> TrackKind;

    fn source(&self) -> TrackSource;

    fn track(&self) -> Option<Arc<dyn LocalTrack>>;
}

/// A remote participant's publication. Subscription state is mutated only
/// through `set_subscribed`; the engine renegotiates on every change.
pub trait RemoteTrackPublication: Send + Sync {
    fn sid(&self) -> TrackSid;

    fn kind(&self) -> TrackKind;

    fn source(&self) -> TrackSource;

    fn is_subscribed(&self) -> bool;

    fn set_subscribed(&self, subscribed: bool);
}
