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

use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use mc_rtc_markers::MarkerSession;
use std::collections::HashSet;

use crate::{BevyViewportBinding, GizmoRequest};

/// The marker session driven by [`InteractiveMarkersPlugin`](crate::InteractiveMarkersPlugin).
/// Use it to add markers, apply remote updates, or grab the inbox sender for
/// a transport thread.
#[derive(Resource, Deref, DerefMut)]
pub struct InteractiveMarkers(pub MarkerSession<BevyViewportBinding>);

/// Widgets that were created by the registry but not spawned yet.
#[derive(Resource, Deref)]
pub struct GizmoRequests(pub Receiver<GizmoRequest>);

/// Marker entities currently held by the user.
#[derive(Resource, Debug, Default, Clone)]
pub struct MarkerDragState {
    pub dragging: HashSet<Entity>,
}

impl MarkerDragState {
    pub fn is_dragging(&self, marker: Entity) -> bool {
        self.dragging.contains(&marker)
    }
}
