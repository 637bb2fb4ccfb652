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

use crate::{
    GizmoAdapter, MarkerMoved, MarkerPhase, MarkerRegistry, MarkerSettings, MarkerState,
};
use tracing::{debug, trace};

/// What happened during one tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    /// Markers that are being dragged at the end of the tick
    pub dragging: usize,
    /// Releases delivered to callbacks, ordered by marker id
    pub released: Vec<MarkerMoved>,
    /// Drags that ended without the adapter producing a pose
    pub cancelled: usize,
}

/// Runs once per frame and reconciles each marker's adapter with its state.
///
/// Markers are visited in id order, and every marker is reconciled using
/// only its own state and adapter, so the outcome for one marker never
/// depends on the others.
#[derive(Debug, Default)]
pub struct ReconciliationLoop {
    ticks: u64,
}

impl ReconciliationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick<A: GizmoAdapter>(&mut self, registry: &mut MarkerRegistry<A>) -> TickReport {
        self.ticks += 1;
        let settings = registry.settings().clone();
        let mut markers: Vec<_> = registry.markers_mut().collect();
        markers.sort_by(|a, b| a.id().cmp(b.id()));

        let mut report = TickReport::default();
        for marker in &mut markers {
            observe(marker, &settings, &mut report);
        }

        for marker in &mut markers {
            if let Some(pose) = marker.deliver_release() {
                report.released.push(MarkerMoved {
                    id: marker.id().clone(),
                    pose,
                });
                // The user may already have grabbed it again.
                if marker.adapter.is_busy() {
                    marker.phase = MarkerPhase::Dragging;
                }
            }

            if marker.phase == MarkerPhase::Dragging {
                report.dragging += 1;
            }
        }

        report
    }
}

fn observe<A: GizmoAdapter>(
    marker: &mut MarkerState<A>,
    settings: &MarkerSettings,
    report: &mut TickReport,
) {
    let busy = marker.adapter.is_busy();
    let released = marker.adapter.take_released_pose();

    match released {
        Some(pose) => {
            // Bindings refuse to start drags on read-only markers, so a drag
            // that ends here began before the marker was locked.
            if marker.read_only {
                debug!(
                    "Interactive marker [{}] became read-only during its drag",
                    marker.id()
                );
            }
            if pose.approx_eq(&marker.last_pose, settings.pose_epsilon) {
                debug!("Interactive marker [{}] released in place", marker.id());
            } else {
                debug!("Interactive marker [{}] released at {pose:?}", marker.id());
            }
            marker.phase = MarkerPhase::Released(pose);
        }
        None if busy => {
            if marker.phase == MarkerPhase::Idle {
                trace!("Interactive marker [{}] is being dragged", marker.id());
            }
            marker.phase = MarkerPhase::Dragging;
        }
        None if marker.phase == MarkerPhase::Dragging => {
            debug!(
                "Drag on interactive marker [{}] ended without a pose",
                marker.id()
            );
            report.cancelled += 1;
            marker.phase = MarkerPhase::Idle;
            let last_pose = marker.last_pose;
            marker.adapter.set_pose(&last_pose);
        }
        None => {
            if settings.reassert_idle_pose {
                let last_pose = marker.last_pose;
                marker.adapter.set_pose(&last_pose);
            }
        }
    }
}
