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

use crate::{ControlAxis, MarkerId, PoseSample};

/// The capabilities the reconciliation core needs from a viewport widget.
///
/// Poses passed through this trait are always in the controller convention.
/// Implementations convert with [`PoseSample::to_viewport`] and
/// [`PoseSample::from_viewport`] at their own boundary.
pub trait GizmoAdapter {
    /// True while the user is interactively editing the widget.
    fn is_busy(&self) -> bool;

    /// Drain the one-shot release signal of the last drag. Once a pose has
    /// been returned, further calls return [`None`] until another drag has
    /// finished. An adapter must produce a pose for every drag that ends.
    fn take_released_pose(&mut self) -> Option<PoseSample>;

    /// Move the widget to `pose`.
    fn set_pose(&mut self, pose: &PoseSample);

    /// Lock or unlock the handles of the widget.
    fn set_read_only(&mut self, read_only: bool);

    fn set_hidden(&mut self, hidden: bool);

    /// Free the viewport resources of this widget. The registry calls this
    /// exactly once, right before dropping the adapter.
    fn release(&mut self);
}

/// Creates adapters for new markers.
pub trait ViewportBinding {
    type Adapter: GizmoAdapter;

    fn spawn_gizmo(
        &mut self,
        id: &MarkerId,
        axis: ControlAxis,
        initial_pose: &PoseSample,
    ) -> Self::Adapter;
}
