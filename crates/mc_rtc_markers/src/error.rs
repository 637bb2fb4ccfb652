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

use crate::MarkerId;
use glam::{DQuat, DVec3};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("a marker with id [{0}] already exists")]
    DuplicateMarker(MarkerId),
    #[error("no marker with id [{0}] is registered")]
    UnknownMarker(MarkerId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported settings format [{0}], expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
}

/// A pose received from outside that cannot be turned into a rigid transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseError {
    #[error("rotation {0:?} cannot be normalized")]
    InvalidRotation(DQuat),
    #[error("translation {0:?} is not finite")]
    InvalidTranslation(DVec3),
}
