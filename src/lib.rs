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

mod observer;

pub mod channel;
pub mod device;
pub mod engine;
pub mod id;
pub mod options;
pub mod session;
pub mod settings;
pub mod subscription;

pub use observer::Dispatcher;

/// `use voice_session::prelude::*;` to import the common types
pub mod prelude;
