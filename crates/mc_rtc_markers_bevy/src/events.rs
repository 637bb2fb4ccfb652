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

use bevy_ecs::prelude::*;
use bevy_transform::prelude::*;
use mc_rtc_markers::MarkerMoved;

/// The user grabbed a handle of the marker. Send this from the picking layer.
#[derive(Debug, Clone, Copy, Event)]
pub struct MarkerDragStarted {
    pub marker: Entity,
}

/// Live feedback while dragging: move the marker root to `transform`.
#[derive(Debug, Clone, Copy, Event)]
pub struct MarkerDragMoved {
    pub marker: Entity,
    pub transform: Transform,
}

/// The user let go of the marker.
#[derive(Debug, Clone, Copy, Event)]
pub struct MarkerDragEnded {
    pub marker: Entity,
}

/// A finished drag was reported upstream.
#[derive(Debug, Clone, Event)]
pub struct MarkerReleased(pub MarkerMoved);
