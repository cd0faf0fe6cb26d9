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

use parking_lot::Mutex;

use crate::engine::{Room, TrackKind, TrackSource};
use crate::id::ParticipantIdentity;

/// Converges remote video subscriptions onto the set of currently visible
/// participants.
///
/// The room is connected with auto-subscribe disabled, so every remote video
/// track is pulled over the wire only while this manager wants it. The
/// visibility set is recomputed by the presentation layer each render pass;
/// `None` means no hint was supplied and every remote video track is wanted.
pub struct SubscriptionManager {
    room: Arc<dyn Room>,
    visible: Mutex<Option<HashSet<ParticipantIdentity>>>,
}

impl SubscriptionManager {
    pub fn new(room: Arc<dyn Room>) -> Self {
        Self { room, visible: Mutex::new(None) }
    }

    /// Replace the visibility set and re-converge immediately.
    pub fn set_visible(&self, visible: Option<HashSet<ParticipantIdentity>>) {
        *self.visible.lock() = visible;
        self.sync();
    }

    /// Diff the desired subscription state of every remote camera and screen
    /// share publication against its actual state, issuing only the changes.
    /// Publications already in the desired state are left untouched so no
    /// redundant renegotiation happens.
    pub fn sync(&self) {
        let visible = self.visible.lock().clone();
        let local = self.room.local_participant().identity();

        for participant in self.room.remote_participants() {
            let identity = participant.identity();
            if identity == local {
                // never self-subscribe
                continue;
            }

            let desired = visible.as_ref().map_or(true, |v| v.contains(&identity));
            for publication in participant.track_publications() {
                if publication.kind() != TrackKind::Video {
                    continue;
                }
                if !matches!(
                    publication.source(),
                    TrackSource::Camera | TrackSource::Screenshare
                ) {
                    continue;
                }

                if publication.is_subscribed() != desired {
                    publication.set_subscribed(desired);
                }
            }
        }
    }
}
