/*
 * Copyright (C) 2025 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

//! Keeps interactive markers of a remote mc_rtc GUI in sync with viewport
//! widgets that the local user can drag.
//!
//! Two producers mutate a marker: the remote controller, which pushes new
//! poses, and the local user, who drags the widget. The [`MarkerRegistry`]
//! holds remote poses back while a drag is in progress, and the
//! [`ReconciliationLoop`] turns every finished drag into exactly one upstream
//! report.

pub mod adapter;
pub use adapter::*;

pub mod axis;
pub use axis::*;

pub mod command;
pub use command::*;

pub mod error;
pub use error::*;

pub mod id;
pub use id::*;

pub mod mock;

pub mod pose;
pub use pose::*;

pub mod reconcile;
pub use reconcile::*;

pub mod registry;
pub use registry::*;

pub mod session;
pub use session::*;

pub mod settings;
pub use settings::*;

pub mod state;
pub use state::*;
