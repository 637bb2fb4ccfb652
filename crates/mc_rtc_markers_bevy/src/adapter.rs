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
use crossbeam_channel::Sender;
use mc_rtc_markers::{ControlAxis, GizmoAdapter, MarkerId, PoseSample, ViewportBinding};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// State shared between a marker's adapter, owned by the registry, and the
/// entity that draws it.
#[derive(Debug, Default, Clone)]
pub struct GizmoSlot {
    /// Root entity, once it has been spawned
    pub entity: Option<Entity>,
    /// Where the widget should be drawn while nobody is dragging it
    pub target: PoseSample,
    pub read_only: bool,
    pub hidden: bool,
    pub dragging: bool,
    /// Pose left behind by the most recent drag, until the registry takes it
    pub released: Option<PoseSample>,
    /// The registry let go of this widget and its entity should be despawned
    pub discarded: bool,
}

pub type SharedSlot = Arc<Mutex<GizmoSlot>>;

pub(crate) fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, GizmoSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`GizmoAdapter`] for a marker drawn as a Bevy entity hierarchy.
#[derive(Debug, Clone)]
pub struct BevyGizmo {
    slot: SharedSlot,
}

impl BevyGizmo {
    pub fn slot(&self) -> &SharedSlot {
        &self.slot
    }
}

impl GizmoAdapter for BevyGizmo {
    fn is_busy(&self) -> bool {
        lock_slot(&self.slot).dragging
    }

    fn take_released_pose(&mut self) -> Option<PoseSample> {
        lock_slot(&self.slot).released.take()
    }

    fn set_pose(&mut self, pose: &PoseSample) {
        lock_slot(&self.slot).target = *pose;
    }

    fn set_read_only(&mut self, read_only: bool) {
        lock_slot(&self.slot).read_only = read_only;
    }

    fn set_hidden(&mut self, hidden: bool) {
        lock_slot(&self.slot).hidden = hidden;
    }

    fn release(&mut self) {
        let mut slot = lock_slot(&self.slot);
        slot.dragging = false;
        slot.released = None;
        slot.discarded = true;
    }
}

/// Asks the world to spawn the entities of a new widget.
#[derive(Debug, Clone)]
pub struct GizmoRequest {
    pub id: MarkerId,
    pub axis: ControlAxis,
    pub slot: SharedSlot,
}

/// Creates widgets for the registry. Entities cannot be spawned from inside
/// the registry, so each widget is queued as a [`GizmoRequest`] and spawned
/// by a system later in the same frame.
#[derive(Debug, Clone)]
pub struct BevyViewportBinding {
    requests: Sender<GizmoRequest>,
}

impl BevyViewportBinding {
    pub fn new(requests: Sender<GizmoRequest>) -> Self {
        Self { requests }
    }
}

impl ViewportBinding for BevyViewportBinding {
    type Adapter = BevyGizmo;

    fn spawn_gizmo(
        &mut self,
        id: &MarkerId,
        axis: ControlAxis,
        initial_pose: &PoseSample,
    ) -> BevyGizmo {
        let slot = Arc::new(Mutex::new(GizmoSlot {
            target: *initial_pose,
            ..Default::default()
        }));

        let request = GizmoRequest {
            id: id.clone(),
            axis,
            slot: slot.clone(),
        };
        if self.requests.send(request).is_err() {
            warn!(
                "Unable to request a widget for interactive marker [{id}]: \
                the viewport is gone"
            );
        }

        BevyGizmo { slot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn spawning_queues_a_request_with_the_initial_pose() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut binding = BevyViewportBinding::new(sender);
        let pose = PoseSample::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let mut gizmo =
            binding.spawn_gizmo(&MarkerId::from("hand"), ControlAxis::TRANSLATION, &pose);

        let request = receiver.try_recv().unwrap();
        assert_eq!(request.id, MarkerId::from("hand"));
        assert_eq!(request.axis, ControlAxis::TRANSLATION);
        assert_eq!(lock_slot(&request.slot).target, pose);

        gizmo.set_read_only(true);
        assert!(lock_slot(&request.slot).read_only);
        gizmo.release();
        assert!(lock_slot(&request.slot).discarded);
        assert!(!gizmo.is_busy());
    }

    #[test]
    fn released_pose_is_taken_once() {
        let (sender, _receiver) = crossbeam_channel::unbounded();
        let mut binding = BevyViewportBinding::new(sender);
        let mut gizmo =
            binding.spawn_gizmo(&MarkerId::from("a"), ControlAxis::ALL, &PoseSample::identity());
        lock_slot(gizmo.slot()).released = Some(PoseSample::identity());
        assert_eq!(gizmo.take_released_pose(), Some(PoseSample::identity()));
        assert_eq!(gizmo.take_released_pose(), None);
    }
}
