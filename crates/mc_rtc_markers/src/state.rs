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

use crate::{ControlAxis, GizmoAdapter, MarkerId, PoseSample};
use std::fmt;

/// Invoked once for every drag that the user finishes on a marker.
pub type MarkerCallback = Box<dyn FnMut(&PoseSample) + Send + Sync>;

/// Where a marker is in its drag cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarkerPhase {
    #[default]
    Idle,
    /// The adapter reports that the user is editing the marker.
    Dragging,
    /// The adapter produced a pose that has not been delivered upstream yet.
    Released(PoseSample),
}

impl MarkerPhase {
    /// Remote updates must not be applied in this phase.
    pub fn is_busy(&self) -> bool {
        !matches!(self, MarkerPhase::Idle)
    }
}

/// Everything the registry tracks for one live marker.
pub struct MarkerState<A> {
    id: MarkerId,
    axis: ControlAxis,
    pub(crate) read_only: bool,
    pub(crate) hidden: bool,
    pub(crate) phase: MarkerPhase,
    pub(crate) last_pose: PoseSample,
    pub(crate) adapter: A,
    pub(crate) callback: MarkerCallback,
}

impl<A: GizmoAdapter> MarkerState<A> {
    pub(crate) fn new(
        id: MarkerId,
        axis: ControlAxis,
        initial_pose: PoseSample,
        mut adapter: A,
        callback: MarkerCallback,
    ) -> Self {
        adapter.set_pose(&initial_pose);
        Self {
            id,
            axis,
            read_only: false,
            hidden: false,
            phase: MarkerPhase::Idle,
            last_pose: initial_pose,
            adapter,
            callback,
        }
    }

    pub fn id(&self) -> &MarkerId {
        &self.id
    }

    pub fn axis(&self) -> ControlAxis {
        self.axis
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn phase(&self) -> MarkerPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn last_pose(&self) -> &PoseSample {
        &self.last_pose
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Deliver a released pose upstream and make it the authoritative pose.
    /// Does nothing unless the marker is in [`MarkerPhase::Released`].
    pub(crate) fn deliver_release(&mut self) -> Option<PoseSample> {
        let MarkerPhase::Released(pose) = self.phase else {
            return None;
        };
        self.phase = MarkerPhase::Idle;
        (self.callback)(&pose);
        self.last_pose = pose;
        Some(pose)
    }
}

impl<A> fmt::Debug for MarkerState<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerState")
            .field("id", &self.id)
            .field("axis", &self.axis)
            .field("read_only", &self.read_only)
            .field("hidden", &self.hidden)
            .field("phase", &self.phase)
            .field("last_pose", &self.last_pose)
            .finish_non_exhaustive()
    }
}
