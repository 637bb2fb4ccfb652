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
    ControlAxis, DuplicatePolicy, GizmoAdapter, MarkerError, MarkerId, MarkerPhase,
    MarkerSettings, MarkerState, PoseSample,
};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Owns every live marker together with its viewport adapter.
///
/// Updates and removals that name an unknown marker are silently ignored
/// because they routinely race with removals on the remote side. Use the
/// `try_` variants where that distinction matters.
pub struct MarkerRegistry<A: GizmoAdapter> {
    markers: HashMap<MarkerId, MarkerState<A>>,
    settings: MarkerSettings,
}

impl<A: GizmoAdapter> Default for MarkerRegistry<A> {
    fn default() -> Self {
        Self::new(MarkerSettings::default())
    }
}

impl<A: GizmoAdapter> MarkerRegistry<A> {
    pub fn new(settings: MarkerSettings) -> Self {
        Self {
            markers: HashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &MarkerSettings {
        &self.settings
    }

    /// Register a marker that is driven by `adapter`. The adapter is moved to
    /// `initial_pose` right away.
    ///
    /// If `id` is taken the new adapter is released immediately and the
    /// outcome depends on [`MarkerSettings::on_duplicate`].
    pub fn create(
        &mut self,
        id: MarkerId,
        axis: ControlAxis,
        initial_pose: PoseSample,
        mut adapter: A,
        callback: impl FnMut(&PoseSample) + Send + Sync + 'static,
    ) -> Result<MarkerId, MarkerError> {
        if self.markers.contains_key(&id) {
            adapter.release();
            return match self.settings.on_duplicate {
                DuplicatePolicy::Reject => {
                    warn!("Rejecting duplicate interactive marker [{id}]");
                    Err(MarkerError::DuplicateMarker(id))
                }
                DuplicatePolicy::KeepExisting => {
                    debug!("Interactive marker [{id}] already exists, keeping it");
                    Ok(id)
                }
            };
        }

        debug!("Creating interactive marker [{id}] with axes {axis:?}");
        let state = MarkerState::new(id.clone(), axis, initial_pose, adapter, Box::new(callback));
        self.markers.insert(id.clone(), state);
        Ok(id)
    }

    /// Apply a pose coming from the remote side. The pose is held back while
    /// the user is dragging the marker so the drag is never overwritten.
    pub fn update(&mut self, id: &MarkerId, read_only: bool, pose: &PoseSample) {
        if self.try_update(id, read_only, pose).is_err() {
            trace!("Ignoring update for unknown interactive marker [{id}]");
        }
    }

    pub fn try_update(
        &mut self,
        id: &MarkerId,
        read_only: bool,
        pose: &PoseSample,
    ) -> Result<(), MarkerError> {
        let marker = self
            .markers
            .get_mut(id)
            .ok_or_else(|| MarkerError::UnknownMarker(id.clone()))?;

        if marker.read_only != read_only {
            marker.read_only = read_only;
            marker.adapter.set_read_only(read_only);
        }

        // The user may have grabbed the handle since the last tick.
        if marker.phase == MarkerPhase::Idle && marker.adapter.is_busy() {
            marker.phase = MarkerPhase::Dragging;
        }

        if marker.is_busy() {
            trace!("Holding back remote pose for [{id}] while it is being dragged");
            return Ok(());
        }

        marker.last_pose = *pose;
        marker.adapter.set_pose(pose);
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &MarkerId, hidden: bool) {
        if self.try_set_hidden(id, hidden).is_err() {
            trace!("Ignoring visibility change for unknown interactive marker [{id}]");
        }
    }

    pub fn try_set_hidden(&mut self, id: &MarkerId, hidden: bool) -> Result<(), MarkerError> {
        let marker = self
            .markers
            .get_mut(id)
            .ok_or_else(|| MarkerError::UnknownMarker(id.clone()))?;
        if marker.hidden != hidden {
            marker.hidden = hidden;
            marker.adapter.set_hidden(hidden);
        }
        Ok(())
    }

    /// Remove a marker and release its adapter. A drag in progress is
    /// discarded without ever reaching the callback. Returns false if the id
    /// was unknown.
    pub fn remove(&mut self, id: &MarkerId) -> bool {
        let Some(marker) = self.markers.remove(id) else {
            trace!("Ignoring removal of unknown interactive marker [{id}]");
            return false;
        };
        debug!("Removing interactive marker [{id}]");
        Self::release(marker);
        true
    }

    pub fn try_remove(&mut self, id: &MarkerId) -> Result<(), MarkerError> {
        if self.remove(id) {
            Ok(())
        } else {
            Err(MarkerError::UnknownMarker(id.clone()))
        }
    }

    /// Remove every marker, releasing all adapters.
    pub fn clear(&mut self) {
        for (_, marker) in self.markers.drain() {
            Self::release(marker);
        }
    }

    fn release(mut marker: MarkerState<A>) {
        if marker.is_busy() || marker.adapter.is_busy() {
            debug!(
                "Discarding the drag in progress on interactive marker [{}]",
                marker.id()
            );
        }
        // Whatever the adapter still holds must not outlive the marker.
        let _ = marker.adapter.take_released_pose();
        marker.adapter.release();
    }

    /// Snapshot of the registered ids.
    pub fn list(&self) -> Vec<MarkerId> {
        self.markers.keys().cloned().collect()
    }

    pub fn get(&self, id: &MarkerId) -> Option<&MarkerState<A>> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub(crate) fn markers_mut(&mut self) -> impl Iterator<Item = &mut MarkerState<A>> {
        self.markers.values_mut()
    }
}

impl<A: GizmoAdapter> Drop for MarkerRegistry<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGizmo;
    use glam::{DQuat, DVec3};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn p(x: f64) -> PoseSample {
        PoseSample::from_translation(DVec3::new(x, 0.0, 0.0))
    }

    fn registry_with(id: &str) -> (MarkerRegistry<MockGizmo>, MockGizmo, MarkerId) {
        let mut registry = MarkerRegistry::default();
        let gizmo = MockGizmo::new(ControlAxis::TX);
        let id = registry
            .create(
                id.into(),
                ControlAxis::TX,
                PoseSample::identity(),
                gizmo.clone(),
                |_| {},
            )
            .unwrap();
        (registry, gizmo, id)
    }

    #[test]
    fn create_moves_adapter_to_initial_pose() {
        let (registry, gizmo, id) = registry_with("M1");
        assert_eq!(gizmo.pose(), Some(PoseSample::identity()));
        assert_eq!(registry.list(), vec![id.clone()]);
        let state = registry.get(&id).unwrap();
        assert_eq!(state.phase(), MarkerPhase::Idle);
        assert_eq!(state.axis(), ControlAxis::TX);
    }

    #[test]
    fn duplicate_is_rejected_and_new_adapter_released() {
        let (mut registry, original, id) = registry_with("M1");
        let extra = MockGizmo::new(ControlAxis::ALL);
        let result = registry.create(
            id.clone(),
            ControlAxis::ALL,
            p(1.0),
            extra.clone(),
            |_| {},
        );
        assert_eq!(result, Err(MarkerError::DuplicateMarker(id.clone())));
        assert!(extra.is_released());
        assert!(!original.is_released());
        assert_eq!(registry.get(&id).unwrap().axis(), ControlAxis::TX);
    }

    #[test]
    fn duplicate_can_keep_existing() {
        let mut registry = MarkerRegistry::new(MarkerSettings {
            on_duplicate: DuplicatePolicy::KeepExisting,
            ..Default::default()
        });
        let first = MockGizmo::new(ControlAxis::TX);
        let second = MockGizmo::new(ControlAxis::TX);
        let id = MarkerId::from("M1");
        registry
            .create(id.clone(), ControlAxis::TX, p(0.0), first.clone(), |_| {})
            .unwrap();
        let again = registry.create(id.clone(), ControlAxis::TX, p(5.0), second.clone(), |_| {});
        assert_eq!(again, Ok(id.clone()));
        assert_eq!(registry.len(), 1);
        assert!(second.is_released());
        assert_eq!(*registry.get(&id).unwrap().last_pose(), p(0.0));
    }

    #[test]
    fn update_forwards_pose_and_read_only() {
        let (mut registry, gizmo, id) = registry_with("M1");
        registry.update(&id, true, &p(2.0));
        let snapshot = gizmo.snapshot();
        assert_eq!(snapshot.pose, Some(p(2.0)));
        assert!(snapshot.read_only);
        assert_eq!(*registry.get(&id).unwrap().last_pose(), p(2.0));
    }

    #[test]
    fn update_is_idempotent() {
        let (mut registry, gizmo, id) = registry_with("M1");
        let pose = PoseSample::new(DVec3::new(0.1, 0.2, 0.3), DQuat::from_rotation_y(0.4));
        registry.update(&id, false, &pose);
        let once = gizmo.snapshot();
        registry.update(&id, false, &pose);
        let twice = gizmo.snapshot();
        assert_eq!(once.pose, twice.pose);
        assert_eq!(once.read_only, twice.read_only);
        assert_eq!(once.hidden, twice.hidden);
        assert_eq!(*registry.get(&id).unwrap().last_pose(), pose);
    }

    #[test]
    fn updates_while_busy_do_not_overwrite_the_drag() {
        let (mut registry, gizmo, id) = registry_with("M1");
        registry.update(&id, false, &p(1.0));
        assert!(gizmo.start_drag());

        for x in [2.0, 3.0, 4.0] {
            registry.update(&id, false, &p(x));
            assert_eq!(gizmo.pose(), Some(p(1.0)));
            assert_eq!(*registry.get(&id).unwrap().last_pose(), p(1.0));
        }
        assert_eq!(registry.get(&id).unwrap().phase(), MarkerPhase::Dragging);
    }

    #[test]
    fn read_only_is_forwarded_even_while_busy() {
        let (mut registry, gizmo, id) = registry_with("M1");
        gizmo.start_drag();
        registry.update(&id, true, &p(3.0));
        assert!(gizmo.snapshot().read_only);
        assert!(registry.get(&id).unwrap().read_only());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (mut registry, gizmo, id) = registry_with("M1");
        let ghost = MarkerId::from("ghost");
        registry.update(&ghost, false, &p(1.0));
        registry.set_hidden(&ghost, true);
        assert!(!registry.remove(&ghost));
        assert_eq!(
            registry.try_update(&ghost, false, &p(1.0)),
            Err(MarkerError::UnknownMarker(ghost.clone()))
        );
        assert_eq!(registry.list(), vec![id]);
        assert_eq!(gizmo.pose(), Some(PoseSample::identity()));
    }

    #[test]
    fn set_hidden_reaches_adapter() {
        let (mut registry, gizmo, id) = registry_with("M1");
        registry.set_hidden(&id, true);
        assert!(gizmo.snapshot().hidden);
        assert!(registry.get(&id).unwrap().hidden());
        registry.set_hidden(&id, false);
        assert!(!gizmo.snapshot().hidden);
    }

    #[test]
    fn remove_releases_once_and_is_not_resurrected() {
        let (mut registry, gizmo, id) = registry_with("M1");
        assert!(registry.remove(&id));
        assert_eq!(gizmo.snapshot().release_calls, 1);
        assert!(!registry.remove(&id));

        registry.update(&id, false, &p(7.0));
        assert!(!registry.contains(&id));
        assert!(registry.list().is_empty());
        assert_eq!(gizmo.snapshot().release_calls, 1);
    }

    #[test]
    fn dropping_registry_releases_everything() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gizmos: Vec<_> = (0..3).map(|_| MockGizmo::new(ControlAxis::ALL)).collect();
        {
            let mut registry = MarkerRegistry::default();
            for (i, gizmo) in gizmos.iter().enumerate() {
                let calls = calls.clone();
                registry
                    .create(
                        format!("m{i}").into(),
                        ControlAxis::ALL,
                        PoseSample::identity(),
                        gizmo.clone(),
                        move |_| {
                            calls.fetch_add(1, Ordering::SeqCst);
                        },
                    )
                    .unwrap();
            }
            gizmos[0].start_drag();
        }
        assert!(gizmos.iter().all(|g| g.snapshot().release_calls == 1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
