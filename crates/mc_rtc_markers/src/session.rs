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
    ControlAxis, ElementId, MarkerCommand, MarkerData, MarkerId, MarkerMoved, MarkerRegistry,
    MarkerSettings, PoseSample, ReconciliationLoop, TickReport, ViewportBinding,
};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The per-connection context that ties a registry to a viewport binding.
///
/// Inbound changes can be applied directly with the methods of this struct,
/// or sent as [`MarkerCommand`]s through [`MarkerSession::inbox`] from another
/// thread. Queued commands are applied at the start of [`MarkerSession::tick`],
/// so marker state is only ever mutated by the thread that ticks.
pub struct MarkerSession<B: ViewportBinding> {
    registry: MarkerRegistry<B::Adapter>,
    binding: B,
    reconcile: ReconciliationLoop,
    seen: HashSet<MarkerId>,
    updating: bool,
    inbox_sender: Sender<MarkerCommand>,
    inbox: Receiver<MarkerCommand>,
    outbound_sender: Sender<MarkerMoved>,
    outbound: Receiver<MarkerMoved>,
}

impl<B: ViewportBinding> MarkerSession<B> {
    pub fn new(binding: B, settings: MarkerSettings) -> Self {
        let (inbox_sender, inbox) = unbounded();
        let (outbound_sender, outbound) = unbounded();
        Self {
            registry: MarkerRegistry::new(settings),
            binding,
            reconcile: ReconciliationLoop::new(),
            seen: HashSet::new(),
            updating: false,
            inbox_sender,
            inbox,
            outbound_sender,
            outbound,
        }
    }

    pub fn registry(&self) -> &MarkerRegistry<B::Adapter> {
        &self.registry
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    pub fn ticks(&self) -> u64 {
        self.reconcile.ticks()
    }

    /// A sender for inbound commands. It can be moved to another thread.
    pub fn inbox(&self) -> Sender<MarkerCommand> {
        self.inbox_sender.clone()
    }

    /// Receives a [`MarkerMoved`] for every finished drag on a marker that was
    /// added without its own callback.
    pub fn outbound(&self) -> Receiver<MarkerMoved> {
        self.outbound.clone()
    }

    /// Get or create the marker for `element`. If it exists with different
    /// axes, it is replaced but keeps its last pose.
    pub fn add_marker(&mut self, element: &ElementId, axis: ControlAxis) -> MarkerId {
        let sender = self.outbound_sender.clone();
        let id = element.marker_id();
        let callback_id = id.clone();
        self.add_marker_with(element, axis, move |pose| {
            let _ = sender.send(MarkerMoved {
                id: callback_id.clone(),
                pose: *pose,
            });
        })
    }

    /// Same as [`MarkerSession::add_marker`] but finished drags are reported to
    /// `callback`. The callback is only installed if a new marker is created.
    pub fn add_marker_with(
        &mut self,
        element: &ElementId,
        axis: ControlAxis,
        callback: impl FnMut(&PoseSample) + Send + Sync + 'static,
    ) -> MarkerId {
        let id = element.marker_id();
        self.seen.insert(id.clone());

        let mut initial_pose = PoseSample::identity();
        let mut flags = None;
        if let Some(existing) = self.registry.get(&id) {
            if existing.axis() == axis {
                return id;
            }
            debug!(
                "Axes of interactive marker [{id}] changed from {:?} to {axis:?}, recreating it",
                existing.axis()
            );
            initial_pose = *existing.last_pose();
            flags = Some((existing.read_only(), existing.hidden()));
            self.registry.remove(&id);
        }

        let adapter = self.binding.spawn_gizmo(&id, axis, &initial_pose);
        if let Err(err) = self
            .registry
            .create(id.clone(), axis, initial_pose, adapter, callback)
        {
            warn!("Unable to add interactive marker [{id}]: {err}");
            return id;
        }

        // The replacement keeps what the remote last said about the marker.
        if let Some((read_only, hidden)) = flags {
            if read_only {
                self.registry.update(&id, true, &initial_pose);
            }
            if hidden {
                self.registry.set_hidden(&id, true);
            }
        }
        id
    }

    pub fn update_marker(&mut self, id: &MarkerId, read_only: bool, pose: &PoseSample) {
        if self.registry.contains(id) {
            self.seen.insert(id.clone());
        }
        self.registry.update(id, read_only, pose);
    }

    /// Add the marker for a remote widget if needed and apply its payload.
    pub fn update_element(
        &mut self,
        element: &ElementId,
        read_only: bool,
        data: &MarkerData,
    ) -> MarkerId {
        let id = self.add_marker(element, data.kind().control_axis());
        self.registry.update(&id, read_only, &data.pose());
        id
    }

    pub fn set_hidden(&mut self, id: &MarkerId, hidden: bool) {
        self.registry.set_hidden(id, hidden);
    }

    pub fn remove_marker(&mut self, id: &MarkerId) -> bool {
        self.seen.remove(id);
        self.registry.remove(id)
    }

    /// Start a cycle in which the remote re-sends all of its elements.
    pub fn begin_update(&mut self) {
        self.updating = true;
        self.seen.clear();
    }

    /// Finish the cycle started by [`MarkerSession::begin_update`] and remove
    /// every marker that was not mentioned during it. Returns the removed ids.
    pub fn end_update(&mut self) -> Vec<MarkerId> {
        if !self.updating {
            warn!("end_update called without a matching begin_update");
            return Vec::new();
        }
        self.updating = false;

        if !self.registry.settings().sweep_unseen {
            return Vec::new();
        }

        let mut unseen: Vec<_> = self
            .registry
            .list()
            .into_iter()
            .filter(|id| !self.seen.contains(id))
            .collect();
        unseen.sort();
        for id in &unseen {
            debug!("Interactive marker [{id}] was not refreshed, removing it");
            self.registry.remove(id);
        }
        unseen
    }

    pub fn apply(&mut self, command: MarkerCommand) {
        match command {
            MarkerCommand::BeginUpdate => self.begin_update(),
            MarkerCommand::EndUpdate => {
                self.end_update();
            }
            MarkerCommand::Add { element, axis } => {
                self.add_marker(&element, axis);
            }
            MarkerCommand::Update {
                id,
                read_only,
                pose,
            } => self.update_marker(&id, read_only, &pose),
            MarkerCommand::Element {
                element,
                read_only,
                data,
            } => {
                self.update_element(&element, read_only, &data);
            }
            MarkerCommand::SetHidden { id, hidden } => self.set_hidden(&id, hidden),
            MarkerCommand::Remove { id } => {
                self.remove_marker(&id);
            }
        }
    }

    /// Apply every queued inbound command. Returns how many were applied.
    pub fn drain_inbox(&mut self) -> usize {
        let mut count = 0;
        while let Ok(command) = self.inbox.try_recv() {
            self.apply(command);
            count += 1;
        }
        count
    }

    /// Apply queued commands, then reconcile every marker once.
    pub fn tick(&mut self) -> TickReport {
        self.drain_inbox();
        self.reconcile.tick(&mut self.registry)
    }
}
