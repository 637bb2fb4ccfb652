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

use bevy_ecs::{hierarchy::ChildOf, name::Name, prelude::*};
use bevy_math::Quat;
use bevy_render::view::Visibility;
use bevy_transform::prelude::*;
use mc_rtc_markers::AxisHandle;
use tracing::{debug, trace};

use crate::{adapter::lock_slot, convert::same_placement, *};

/// Feed drag events from the picking layer into the widgets' shared slots.
pub fn apply_drag_input(
    mut started: EventReader<MarkerDragStarted>,
    mut moved: EventReader<MarkerDragMoved>,
    mut ended: EventReader<MarkerDragEnded>,
    mut markers: Query<(&InteractiveMarker, &GizmoLink, &mut Transform)>,
    mut drag_state: ResMut<MarkerDragState>,
) {
    for event in started.read() {
        let Ok((marker, link, _)) = markers.get(event.marker) else {
            continue;
        };
        let mut slot = lock_slot(&link.0);
        if slot.read_only {
            debug!("Ignoring drag on read-only interactive marker [{}]", marker.id);
            continue;
        }
        slot.dragging = true;
        drag_state.dragging.insert(event.marker);
    }

    for event in moved.read() {
        let Ok((_, link, mut tf)) = markers.get_mut(event.marker) else {
            continue;
        };
        if lock_slot(&link.0).dragging {
            *tf = event.transform;
        }
    }

    for event in ended.read() {
        let Ok((marker, link, tf)) = markers.get(event.marker) else {
            continue;
        };
        let mut slot = lock_slot(&link.0);
        if !slot.dragging {
            continue;
        }
        let pose = pose_from_transform(tf);
        trace!("Drag on interactive marker [{}] ended at {pose:?}", marker.id);
        slot.dragging = false;
        slot.released = Some(pose);
        // The widget stays where the user left it.
        slot.target = pose;
        drag_state.dragging.remove(&event.marker);
    }
}

pub fn tick_interactive_markers(
    mut markers: ResMut<InteractiveMarkers>,
    mut released: EventWriter<MarkerReleased>,
) {
    let report = markers.tick();
    for moved in report.released {
        released.write(MarkerReleased(moved));
    }
}

pub fn spawn_requested_gizmos(mut commands: Commands, requests: Res<GizmoRequests>) {
    for request in requests.try_iter() {
        let mut slot = lock_slot(&request.slot);
        if slot.discarded {
            // Removed before it was ever drawn
            continue;
        }

        let marker = commands
            .spawn((
                InteractiveMarker {
                    id: request.id.clone(),
                    axis: request.axis,
                },
                GizmoLink(request.slot.clone()),
                transform_from_pose(&slot.target),
                if slot.hidden {
                    Visibility::Hidden
                } else {
                    Visibility::Inherited
                },
                Name::new(format!("interactive_marker:{}", request.id)),
            ))
            .id();

        for handle in request.axis.handles() {
            commands
                .spawn((
                    MarkerHandle {
                        marker,
                        handle,
                        locked: slot.read_only,
                    },
                    Transform::from_rotation(handle_rotation(handle)),
                    Visibility::default(),
                ))
                .insert(ChildOf(marker));
        }

        debug!(
            "Spawned widget for interactive marker [{}] with {} handles",
            request.id,
            request.axis.handles().count()
        );
        slot.entity = Some(marker);
    }
}

/// Orient a handle so that its local Z axis runs along the axis it controls.
pub fn handle_rotation(handle: AxisHandle) -> Quat {
    let x = Quat::from_rotation_y(90_f32.to_radians());
    let y = Quat::from_rotation_x(-90_f32.to_radians());
    match handle {
        AxisHandle::TranslateX | AxisHandle::RotateX => x,
        AxisHandle::TranslateY | AxisHandle::RotateY => y,
        AxisHandle::TranslateZ | AxisHandle::RotateZ => Quat::IDENTITY,
    }
}

/// Push the registry's view of each widget onto its entities.
pub fn sync_gizmo_entities(
    mut markers: Query<(&GizmoLink, &mut Transform, &mut Visibility), With<InteractiveMarker>>,
    mut handles: Query<&mut MarkerHandle>,
    interactive: Res<InteractiveMarkers>,
) {
    let epsilon = interactive.registry().settings().pose_epsilon as f32;
    for (link, mut tf, mut visibility) in &mut markers {
        let slot = lock_slot(&link.0);
        if !slot.dragging {
            let desired = transform_from_pose(&slot.target);
            if !same_placement(&tf, &desired, epsilon) {
                *tf = desired;
            }
        }

        let desired = if slot.hidden {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
        if *visibility != desired {
            *visibility = desired;
        }
    }

    for mut handle in &mut handles {
        let Ok((link, _, _)) = markers.get(handle.marker) else {
            continue;
        };
        let read_only = lock_slot(&link.0).read_only;
        if handle.locked != read_only {
            handle.locked = read_only;
        }
    }
}

pub fn despawn_released_gizmos(
    mut commands: Commands,
    markers: Query<(Entity, &InteractiveMarker, &GizmoLink)>,
    mut drag_state: ResMut<MarkerDragState>,
) {
    for (e, marker, link) in &markers {
        if !lock_slot(&link.0).discarded {
            continue;
        }
        debug!("Despawning widget of interactive marker [{}]", marker.id);
        drag_state.dragging.remove(&e);
        commands.entity(e).despawn();
    }
}

