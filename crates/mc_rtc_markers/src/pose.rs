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

use crate::PoseError;
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// A rigid transform as exchanged with the remote controller.
///
/// The rotation is stored in the controller's convention, which is the
/// inverse of the rotation that a viewport would naturally apply to an
/// object. Use [`PoseSample::to_viewport`] and [`PoseSample::from_viewport`]
/// whenever a pose crosses into or out of a viewport binding.
///
/// Deserialized poses always carry a unit rotation: the quaternion is
/// normalized, and zero or non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPose")]
pub struct PoseSample {
    pub translation: DVec3,
    pub rotation: DQuat,
}

#[derive(Deserialize)]
struct RawPose {
    translation: DVec3,
    rotation: DQuat,
}

impl TryFrom<RawPose> for PoseSample {
    type Error = PoseError;

    fn try_from(raw: RawPose) -> Result<Self, Self::Error> {
        Self::try_new(raw.translation, raw.rotation)
    }
}

impl Default for PoseSample {
    fn default() -> Self {
        Self::identity()
    }
}

impl PoseSample {
    pub fn identity() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }

    /// The rotation is normalized on construction.
    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
        }
    }

    /// Like [`PoseSample::new`] but fails instead of producing NaN when the
    /// input cannot describe a rigid transform.
    pub fn try_new(translation: DVec3, rotation: DQuat) -> Result<Self, PoseError> {
        if !translation.is_finite() {
            return Err(PoseError::InvalidTranslation(translation));
        }
        let length = rotation.length();
        if !length.is_finite() || length <= f64::EPSILON {
            return Err(PoseError::InvalidRotation(rotation));
        }
        Ok(Self {
            translation,
            rotation: rotation / length,
        })
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Build a planar pose from `(x, y, theta)` at the given altitude. The
    /// rotation matches the controller's `RotZ(theta)`.
    pub fn from_xytheta(x: f64, y: f64, theta: f64, altitude: f64) -> Self {
        Self {
            translation: DVec3::new(x, y, altitude),
            rotation: DQuat::from_rotation_z(-theta),
        }
    }

    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn inverse_rotation(&self) -> DQuat {
        self.rotation.inverse().normalize()
    }

    /// Compare two poses up to `epsilon` on every translation component and on
    /// the rotation. `q` and `-q` describe the same rotation and compare equal.
    pub fn approx_eq(&self, other: &PoseSample, epsilon: f64) -> bool {
        if !self.translation.abs_diff_eq(other.translation, epsilon) {
            return false;
        }

        let (a, b) = (self.rotation, other.rotation);
        a.abs_diff_eq(b, epsilon) || a.abs_diff_eq(-b, epsilon)
    }

    /// The pose as a viewport should display it.
    pub fn to_viewport(&self) -> ViewportPose {
        ViewportPose {
            translation: self.translation,
            rotation: self.inverse_rotation(),
        }
    }

    /// Read back a pose that was produced by a viewport, e.g. at the end of a
    /// drag.
    pub fn from_viewport(pose: &ViewportPose) -> Self {
        Self {
            translation: pose.translation,
            rotation: pose.rotation.inverse().normalize(),
        }
    }
}

/// A pose in the viewport convention: `rotation` rotates the object from its
/// local frame into the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPose {
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl Default for ViewportPose {
    fn default() -> Self {
        PoseSample::identity().to_viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_has_no_offset() {
        let pose = PoseSample::identity();
        assert_eq!(pose.translation, DVec3::ZERO);
        assert_eq!(pose.rotation, DQuat::IDENTITY);
        assert_eq!(pose, PoseSample::default());
    }

    #[test]
    fn approx_eq_tolerates_small_noise_and_sign_flip() {
        let pose = PoseSample::new(DVec3::new(1.0, 2.0, 3.0), DQuat::from_rotation_x(0.3));
        let mut noisy = pose;
        noisy.translation.x += 1e-9;
        assert!(pose.approx_eq(&noisy, 1e-6));

        let flipped = PoseSample {
            translation: pose.translation,
            rotation: -pose.rotation,
        };
        assert!(pose.approx_eq(&flipped, 1e-6));

        let moved = pose.with_translation(DVec3::new(1.0, 2.0, 3.1));
        assert!(!pose.approx_eq(&moved, 1e-6));
    }

    #[test]
    fn viewport_rotation_is_inverted_for_reference_pose() {
        // The controller's RotZ(90deg) is displayed as a +90deg turn about Z.
        let pose = PoseSample::from_xytheta(1.0, 2.0, FRAC_PI_2, 0.5);
        let viewport = pose.to_viewport();

        let x_axis = viewport.rotation * DVec3::X;
        assert_float_eq!(x_axis.to_array(), [0.0, 1.0, 0.0], abs_all <= 1e-12);
        assert_float_eq!(
            viewport.translation.to_array(),
            [1.0, 2.0, 0.5],
            abs_all <= 1e-12
        );

        let internal_x = pose.rotation * DVec3::X;
        assert_float_eq!(internal_x.to_array(), [0.0, -1.0, 0.0], abs_all <= 1e-12);
    }

    #[test]
    fn deserialized_rotation_is_normalized() {
        let text = r#"{"translation": [1.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 2.0]}"#;
        let pose: PoseSample = serde_json::from_str(text).unwrap();
        assert!(pose.rotation.is_normalized());
        assert_eq!(pose.rotation, DQuat::IDENTITY);
        assert!(pose.inverse_rotation().is_finite());
    }

    #[test]
    fn degenerate_rotations_are_rejected() {
        let zero = r#"{"translation": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 0.0]}"#;
        assert!(serde_json::from_str::<PoseSample>(zero).is_err());

        let nan = "translation: [0.0, 0.0, 0.0]\nrotation: [0.0, 0.0, .nan, 1.0]\n";
        assert!(serde_yaml::from_str::<PoseSample>(nan).is_err());

        assert_eq!(
            PoseSample::try_new(DVec3::ZERO, DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
            Err(PoseError::InvalidRotation(DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0)))
        );
        let far = DVec3::new(f64::INFINITY, 0.0, 0.0);
        assert!(PoseSample::try_new(far, DQuat::IDENTITY).is_err());
    }

    #[test]
    fn viewport_conversion_is_an_involution() {
        let pose = PoseSample::new(
            DVec3::new(-0.2, 0.4, 1.1),
            DQuat::from_euler(glam::EulerRot::XYZ, 0.1, -0.7, 1.3),
        );
        let back = PoseSample::from_viewport(&pose.to_viewport());
        assert!(pose.approx_eq(&back, 1e-12));
    }
}
