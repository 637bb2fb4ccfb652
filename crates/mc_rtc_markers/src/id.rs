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

use crate::{ControlAxis, PoseSample};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a marker inside a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for MarkerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies an element of the remote GUI by its category path and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    #[serde(default)]
    pub category: Vec<String>,
    pub name: String,
}

impl ElementId {
    pub fn new<S: Into<String>>(
        category: impl IntoIterator<Item = S>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    pub fn marker_id(&self) -> MarkerId {
        let mut id = self.category.join("/");
        if !id.is_empty() {
            id.push('/');
        }
        id.push_str(&self.name);
        MarkerId(id)
    }
}

/// The kinds of remote GUI elements that are shown as interactive markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    #[serde(rename = "point3d")]
    Point3D,
    Rotation,
    Transform,
    #[serde(rename = "xytheta")]
    XYTheta,
}

impl MarkerKind {
    pub fn control_axis(&self) -> ControlAxis {
        match self {
            Self::Point3D => ControlAxis::TRANSLATION,
            Self::Rotation => ControlAxis::ROTATION,
            Self::Transform => ControlAxis::ALL,
            Self::XYTheta => ControlAxis::XYZTHETA,
        }
    }
}

/// Payload carried by a remote element update, before it is turned into a
/// [`PoseSample`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerData {
    #[serde(rename = "point3d")]
    Point3D {
        position: DVec3,
    },
    Rotation {
        pose: PoseSample,
    },
    Transform {
        pose: PoseSample,
    },
    #[serde(rename = "xytheta")]
    XYTheta {
        x: f64,
        y: f64,
        theta: f64,
        altitude: f64,
    },
}

impl MarkerData {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Self::Point3D { .. } => MarkerKind::Point3D,
            Self::Rotation { .. } => MarkerKind::Rotation,
            Self::Transform { .. } => MarkerKind::Transform,
            Self::XYTheta { .. } => MarkerKind::XYTheta,
        }
    }

    pub fn pose(&self) -> PoseSample {
        match *self {
            Self::Point3D { position } => PoseSample::new(position, DQuat::IDENTITY),
            Self::Rotation { pose } | Self::Transform { pose } => pose,
            Self::XYTheta {
                x,
                y,
                theta,
                altitude,
            } => PoseSample::from_xytheta(x, y, theta, altitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_id_joins_category_path() {
        let id = ElementId::new(["Tasks", "CoM"], "target");
        assert_eq!(id.marker_id(), MarkerId::from("Tasks/CoM/target"));

        let root = ElementId::new(Vec::<String>::new(), "frame");
        assert_eq!(root.marker_id().as_str(), "frame");
    }

    #[test]
    fn xytheta_payload_uses_altitude_as_height() {
        let data = MarkerData::XYTheta {
            x: 1.0,
            y: -1.0,
            theta: 0.0,
            altitude: 0.8,
        };
        assert_eq!(data.kind().control_axis(), ControlAxis::XYZTHETA);
        assert_eq!(data.pose().translation, DVec3::new(1.0, -1.0, 0.8));
    }

    #[test]
    fn marker_data_parses_from_json() {
        let data: MarkerData =
            serde_json::from_str(r#"{"kind": "point3d", "position": [0.0, 1.0, 2.0]}"#)
                .unwrap();
        assert_eq!(data.pose(), PoseSample::from_translation(DVec3::new(0.0, 1.0, 2.0)));
    }
}
