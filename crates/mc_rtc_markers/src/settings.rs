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

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What [`MarkerRegistry::create`](crate::MarkerRegistry::create) does when
/// the id is already taken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Return [`MarkerError::DuplicateMarker`](crate::MarkerError::DuplicateMarker)
    /// and release the adapter that came with the request.
    #[default]
    Reject,
    /// Keep the registered marker untouched and report success. The adapter
    /// that came with the request is released.
    KeepExisting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Poses closer than this on every component are considered unchanged.
    pub pose_epsilon: f64,
    pub on_duplicate: DuplicatePolicy,
    /// Push the last known pose back to idle adapters on every tick.
    pub reassert_idle_pose: bool,
    /// Remove markers that were not refreshed between `begin_update` and
    /// `end_update`.
    pub sweep_unseen: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            pose_epsilon: 1e-6,
            on_duplicate: DuplicatePolicy::default(),
            reassert_idle_pose: true,
            sweep_unseen: true,
        }
    }
}

impl MarkerSettings {
    pub fn from_str_yaml(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_str_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load settings, choosing the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Self::from_str_yaml(&std::fs::read_to_string(path)?),
            "json" => Self::from_str_json(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn to_string_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = MarkerSettings::from_str_yaml("pose_epsilon: 0.001\n").unwrap();
        assert_eq!(settings.pose_epsilon, 0.001);
        assert_eq!(settings.on_duplicate, DuplicatePolicy::Reject);
        assert!(settings.reassert_idle_pose);
        assert!(settings.sweep_unseen);
    }

    #[test]
    fn json_settings_select_policy() {
        let text = r#"{"on_duplicate": "keep_existing", "sweep_unseen": false}"#;
        let settings = MarkerSettings::from_str_json(text).unwrap();
        assert_eq!(settings.on_duplicate, DuplicatePolicy::KeepExisting);
        assert!(!settings.sweep_unseen);
    }

    #[test]
    fn yaml_output_parses_back() {
        let settings = MarkerSettings {
            pose_epsilon: 1e-3,
            ..Default::default()
        };
        let text = settings.to_string_yaml().unwrap();
        assert_eq!(MarkerSettings::from_str_yaml(&text).unwrap(), settings);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = MarkerSettings::load("markers.toml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
