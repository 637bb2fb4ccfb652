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

//! Draws mc_rtc interactive markers as Bevy entities and feeds user drags
//! back into the marker registry.
//!
//! Each marker is a root entity carrying [`InteractiveMarker`] whose
//! `Transform` is the marker pose, with one [`MarkerHandle`] child per
//! controllable axis. This crate does not decide how handles look or how
//! they are picked: the application attaches meshes to handles and sends
//! [`MarkerDragStarted`], [`MarkerDragMoved`] and [`MarkerDragEnded`] events
//! from its picking layer.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use mc_rtc_markers::{MarkerSession, MarkerSettings};

pub mod adapter;
pub use adapter::*;

pub mod components;
pub use components::*;

pub mod convert;
pub use convert::*;

pub mod events;
pub use events::*;

pub mod resources;
pub use resources::*;

pub mod systems;
pub use systems::*;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum InteractiveMarkerStages {
    /// Drag events are applied to the widgets
    Input,
    /// The registry reconciles widgets with remote state
    Reconcile,
    /// Widgets are spawned and their entities updated
    Sync,
    /// Widgets released by the registry are despawned
    Cleanup,
}

#[derive(Default)]
pub struct InteractiveMarkersPlugin {
    pub settings: MarkerSettings,
}

impl InteractiveMarkersPlugin {
    pub fn new(settings: MarkerSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for InteractiveMarkersPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let binding = BevyViewportBinding::new(sender);
        let session = MarkerSession::new(binding, self.settings.clone());

        app.configure_sets(
            Update,
            (
                InteractiveMarkerStages::Input,
                InteractiveMarkerStages::Reconcile,
                InteractiveMarkerStages::Sync,
                InteractiveMarkerStages::Cleanup,
            )
                .chain(),
        )
        .insert_resource(InteractiveMarkers(session))
        .insert_resource(GizmoRequests(receiver))
        .init_resource::<MarkerDragState>()
        .add_event::<MarkerDragStarted>()
        .add_event::<MarkerDragMoved>()
        .add_event::<MarkerDragEnded>()
        .add_event::<MarkerReleased>()
        .add_systems(
            Update,
            (
                apply_drag_input.in_set(InteractiveMarkerStages::Input),
                tick_interactive_markers.in_set(InteractiveMarkerStages::Reconcile),
                (spawn_requested_gizmos, sync_gizmo_entities)
                    .chain()
                    .in_set(InteractiveMarkerStages::Sync),
                despawn_released_gizmos.in_set(InteractiveMarkerStages::Cleanup),
            ),
        );
    }
}
