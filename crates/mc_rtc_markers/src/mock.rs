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

//! A viewport binding without a viewport. Every [`MockGizmo`] is a cheap
//! handle onto shared state, so a test or a replay script can keep a copy and
//! simulate user drags while the registry owns the other copy.

use crate::{ControlAxis, GizmoAdapter, MarkerId, PoseSample, ViewportBinding};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockGizmoState {
    pub axis: ControlAxis,
    pub busy: bool,
    pub released: Option<PoseSample>,
    /// The last pose pushed by the core
    pub pose: Option<PoseSample>,
    pub read_only: bool,
    pub hidden: bool,
    pub set_pose_calls: usize,
    pub release_calls: usize,
}

#[derive(Debug, Default, Clone)]
pub struct MockGizmo {
    state: Arc<Mutex<MockGizmoState>>,
}

impl MockGizmo {
    pub fn new(axis: ControlAxis) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockGizmoState {
                axis,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockGizmoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate the user grabbing a handle. Read-only gizmos cannot be
    /// grabbed, in which case this returns false.
    pub fn start_drag(&self) -> bool {
        let mut state = self.lock();
        if state.read_only {
            return false;
        }
        state.busy = true;
        true
    }

    /// Simulate the user letting go of the handle at `pose`.
    pub fn finish_drag(&self, pose: PoseSample) {
        let mut state = self.lock();
        state.busy = false;
        state.released = Some(pose);
    }

    /// Simulate a drag that ends without producing a pose, e.g. because the
    /// host cancelled it.
    pub fn abort_drag(&self) {
        self.lock().busy = false;
    }

    /// Simulate the host moving the widget behind the core's back, e.g. by
    /// re-parenting it.
    pub fn nudge(&self, pose: PoseSample) {
        self.lock().pose = Some(pose);
    }

    pub fn snapshot(&self) -> MockGizmoState {
        self.lock().clone()
    }

    pub fn pose(&self) -> Option<PoseSample> {
        self.lock().pose
    }

    pub fn is_released(&self) -> bool {
        self.lock().release_calls > 0
    }
}

impl GizmoAdapter for MockGizmo {
    fn is_busy(&self) -> bool {
        self.lock().busy
    }

    fn take_released_pose(&mut self) -> Option<PoseSample> {
        self.lock().released.take()
    }

    fn set_pose(&mut self, pose: &PoseSample) {
        let mut state = self.lock();
        state.pose = Some(*pose);
        state.set_pose_calls += 1;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.lock().hidden = hidden;
    }

    fn release(&mut self) {
        self.lock().release_calls += 1;
    }
}

/// Hands out [`MockGizmo`]s and remembers the live one for each marker.
#[derive(Debug, Default)]
pub struct MockBinding {
    gizmos: HashMap<MarkerId, MockGizmo>,
}

impl MockBinding {
    /// The gizmo currently showing the marker. Gizmos released by the core
    /// are gone from the viewport and are not returned.
    pub fn gizmo(&self, id: &MarkerId) -> Option<MockGizmo> {
        self.gizmos.get(id).filter(|gizmo| !gizmo.is_released()).cloned()
    }
}

impl ViewportBinding for MockBinding {
    type Adapter = MockGizmo;

    fn spawn_gizmo(
        &mut self,
        id: &MarkerId,
        axis: ControlAxis,
        _initial_pose: &PoseSample,
    ) -> MockGizmo {
        self.gizmos.retain(|_, gizmo| !gizmo.is_released());
        let gizmo = MockGizmo::new(axis);
        self.gizmos.insert(id.clone(), gizmo.clone());
        gizmo
    }
}
