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

//! Replays a scripted marker session against [`MockBinding`] widgets.
//!
//! A script is a JSON array of steps. Remote commands are pushed through the
//! session inbox, drags are simulated on the widgets, and every drag reported
//! upstream is collected in order.
//!
//! ```json
//! [
//!   {"step": "command", "command": {"type": "add", "element": {"name": "hand"}, "axis": "TX | TY"}},
//!   {"step": "drag_start", "id": "hand"},
//!   {"step": "tick"},
//!   {"step": "drag_release", "id": "hand", "pose": {"translation": [1, 0, 0], "rotation": [0, 0, 0, 1]}},
//!   {"step": "tick", "count": 2}
//! ]
//! ```

use mc_rtc_markers::{
    MarkerCommand, MarkerId, MarkerMoved, MarkerSession, MarkerSettings, PoseSample, TickReport,
    mock::{MockBinding, MockGizmo},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Queue a command as if it came from the remote controller
    Command { command: MarkerCommand },
    /// The user grabs the widget of a marker
    DragStart { id: MarkerId },
    /// The user moves the widget while holding it
    DragMove { id: MarkerId, pose: PoseSample },
    /// The user lets go of the widget at `pose`
    DragRelease { id: MarkerId, pose: PoseSample },
    /// The host cancels the drag without producing a pose
    DragAbort { id: MarkerId },
    /// Run the reconciliation loop
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
}

fn one() -> u32 {
    1
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("unable to read the script: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step} refers to marker [{id}] which has no widget")]
    UnknownWidget { step: usize, id: MarkerId },
}

pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ScriptError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ReplayStep>, ScriptError> {
    parse_script(&std::fs::read_to_string(path)?)
}

pub struct Replay {
    session: MarkerSession<MockBinding>,
    ticks_per_step: u32,
    reported: Vec<MarkerMoved>,
    cancelled: usize,
}

impl Replay {
    pub fn new(settings: MarkerSettings) -> Self {
        Self {
            session: MarkerSession::new(MockBinding::default(), settings),
            ticks_per_step: 0,
            reported: Vec::new(),
            cancelled: 0,
        }
    }

    /// Run the loop this many extra times after every step.
    pub fn with_ticks_per_step(mut self, ticks: u32) -> Self {
        self.ticks_per_step = ticks;
        self
    }

    pub fn session(&self) -> &MarkerSession<MockBinding> {
        &self.session
    }

    /// Every drag reported upstream so far, in the order it was reported.
    pub fn reported(&self) -> &[MarkerMoved] {
        &self.reported
    }

    /// Drags that ended without producing a pose.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn run(&mut self, steps: &[ReplayStep]) -> Result<&[MarkerMoved], ScriptError> {
        for (i, step) in steps.iter().enumerate() {
            self.step(i, step)?;
            for _ in 0..self.ticks_per_step {
                self.tick();
            }
        }
        info!(
            "Replayed {} steps in {} ticks, {} drags reported",
            steps.len(),
            self.session.ticks(),
            self.reported.len()
        );
        Ok(&self.reported)
    }

    fn step(&mut self, i: usize, step: &ReplayStep) -> Result<(), ScriptError> {
        debug!("Step {i}: {step:?}");
        match step {
            ReplayStep::Command { command } => {
                // The inbox is unbounded and owned by the session, so this
                // cannot fail while the session is alive.
                let _ = self.session.inbox().send(command.clone());
            }
            ReplayStep::DragStart { id } => {
                if !self.gizmo(i, id)?.start_drag() {
                    warn!("Step {i}: marker [{id}] is read-only and cannot be dragged");
                }
            }
            ReplayStep::DragMove { id, pose } => {
                self.gizmo(i, id)?.nudge(*pose);
            }
            ReplayStep::DragRelease { id, pose } => {
                self.gizmo(i, id)?.finish_drag(*pose);
            }
            ReplayStep::DragAbort { id } => {
                self.gizmo(i, id)?.abort_drag();
            }
            ReplayStep::Tick { count } => {
                for _ in 0..*count {
                    self.tick();
                }
            }
        }
        Ok(())
    }

    fn gizmo(&self, step: usize, id: &MarkerId) -> Result<MockGizmo, ScriptError> {
        self.session
            .binding()
            .gizmo(id)
            .ok_or_else(|| ScriptError::UnknownWidget {
                step,
                id: id.clone(),
            })
    }

    fn tick(&mut self) -> TickReport {
        let report = self.session.tick();
        self.cancelled += report.cancelled;
        self.reported.extend(self.session.outbound().try_iter());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_rtc_markers::ControlAxis;

    const SCRIPT: &str = r#"[
        {"step": "command", "command": {"type": "add", "element": {"category": ["Tasks"], "name": "hand"}, "axis": "TX | TY | TZ"}},
        {"step": "tick"},
        {"step": "drag_start", "id": "Tasks/hand"},
        {"step": "tick"},
        {"step": "command", "command": {"type": "update", "id": "Tasks/hand", "read_only": false,
            "pose": {"translation": [5.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0]}}},
        {"step": "tick"},
        {"step": "drag_release", "id": "Tasks/hand",
            "pose": {"translation": [1.0, 2.0, 3.0], "rotation": [0.0, 0.0, 0.0, 1.0]}},
        {"step": "tick", "count": 3}
    ]"#;

    #[test]
    fn drags_are_reported_once_and_remote_updates_wait() {
        let steps = parse_script(SCRIPT).unwrap();
        let mut replay = Replay::new(MarkerSettings::default());
        let reported = replay.run(&steps).unwrap().to_vec();

        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].id, MarkerId::from("Tasks/hand"));
        assert_eq!(reported[0].pose.translation.to_array(), [1.0, 2.0, 3.0]);

        let id = MarkerId::from("Tasks/hand");
        let marker = replay.session().registry().get(&id).unwrap();
        assert_eq!(marker.axis(), ControlAxis::TRANSLATION);
        // The update sent during the drag never reached the widget.
        assert_eq!(
            replay.session().binding().gizmo(&id).unwrap().pose(),
            Some(reported[0].pose)
        );
    }

    #[test]
    fn replays_are_deterministic() {
        let steps = parse_script(SCRIPT).unwrap();
        let first = Replay::new(MarkerSettings::default()).run(&steps).unwrap().to_vec();
        let second = Replay::new(MarkerSettings::default())
            .with_ticks_per_step(2)
            .run(&steps)
            .unwrap()
            .to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn aborted_drags_are_counted_but_not_reported() {
        let steps = parse_script(
            r#"[
            {"step": "command", "command": {"type": "add", "element": {"name": "com"}, "axis": "TX"}},
            {"step": "tick"},
            {"step": "drag_start", "id": "com"},
            {"step": "tick"},
            {"step": "drag_abort", "id": "com"},
            {"step": "tick"}
        ]"#,
        )
        .unwrap();
        let mut replay = Replay::new(MarkerSettings::default());
        assert!(replay.run(&steps).unwrap().is_empty());
        assert_eq!(replay.cancelled(), 1);
    }

    #[test]
    fn bundled_script_reports_the_hand_only() {
        let steps = parse_script(include_str!("../scripts/drag_during_update.json")).unwrap();
        let mut replay = Replay::new(MarkerSettings::default());
        let reported = replay.run(&steps).unwrap().to_vec();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].id, MarkerId::from("Tasks/RightHand/target"));
        assert_eq!(replay.session().registry().len(), 2);
        assert!(
            replay
                .session()
                .registry()
                .get(&MarkerId::from("Tasks/com"))
                .unwrap()
                .read_only()
        );
    }

    #[test]
    fn dragging_a_marker_without_widget_is_an_error() {
        let steps = parse_script(r#"[{"step": "drag_start", "id": "ghost"}]"#).unwrap();
        let err = Replay::new(MarkerSettings::default()).run(&steps).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownWidget { step: 0, .. }));
    }

    #[test]
    fn dragging_a_removed_marker_is_an_error() {
        let steps = parse_script(
            r#"[
            {"step": "command", "command": {"type": "add", "element": {"name": "com"}, "axis": "TX"}},
            {"step": "tick"},
            {"step": "command", "command": {"type": "remove", "id": "com"}},
            {"step": "tick"},
            {"step": "drag_start", "id": "com"}
        ]"#,
        )
        .unwrap();
        let err = Replay::new(MarkerSettings::default()).run(&steps).unwrap_err();
        assert!(matches!(err, ScriptError::UnknownWidget { step: 4, .. }));
    }
}
