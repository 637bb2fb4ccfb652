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
use mc_rtc_markers::{AxisHandle, ControlAxis, MarkerId};

use crate::SharedSlot;

/// Root entity of an interactive marker. Its [`Transform`](bevy_transform::prelude::Transform)
/// is the marker pose in the viewport convention.
#[derive(Component, Debug, Clone)]
pub struct InteractiveMarker {
    pub id: MarkerId,
    pub axis: ControlAxis,
}

/// One draggable handle of a marker, spawned as a child of the marker root.
#[derive(Component, Debug, Clone, Copy)]
pub struct MarkerHandle {
    /// The marker root that moves when this handle is dragged
    pub marker: Entity,
    pub handle: AxisHandle,
    /// The marker is read-only, so this handle must not start drags
    pub locked: bool,
}

/// Connects a marker entity to the adapter owned by the registry.
#[derive(Component, Clone)]
pub struct GizmoLink(pub SharedSlot);
