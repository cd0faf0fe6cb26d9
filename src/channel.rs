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
use thiserror::Error;

use crate::id::ChannelId;

/// Region requested when no explicit join credential is supplied.
pub const DEFAULT_CALL_REGION: &str = "worldwide";

/// Channel-scoped capabilities. Resolved by the chat service and re-evaluated
/// on every query; grants can change while a call is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Listen,
    Speak,
    Video,
}

/// Credential for joining a channel's call.
#[derive(Debug, Clone)]
pub struct JoinAuth {
    pub url: String,
    pub token: String,
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("failed to acquire a join credential: {0}")]
    Join(String),
}

/// The chat channel a call is bound to.
#[async_trait]
pub trait Channel: Send + Sync {
    fn id(&self) -> ChannelId;

    fn have_permission(&self, permission: Permission) -> bool;

    async fn join_call(&self, region: &str) -> Result<JoinAuth, ChannelError>;
}
