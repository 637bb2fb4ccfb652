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

use bevy_math::{Quat, Vec3};
use bevy_transform::prelude::*;
use mc_rtc_markers::{PoseSample, ViewportPose};

/// Place a marker root in the viewport. The rotation is inverted on the way
/// out, see [`PoseSample::to_viewport`].
pub fn transform_from_pose(pose: &PoseSample) -> Transform {
    let viewport = pose.to_viewport();
    Transform::from_rotation(viewport.rotation.as_quat())
        .with_translation(viewport.translation.as_vec3())
}

pub fn pose_from_transform(tf: &Transform) -> PoseSample {
    PoseSample::from_viewport(&ViewportPose {
        translation: tf.translation.as_dvec3(),
        rotation: tf.rotation.as_dquat(),
    })
}

/// Whether two transforms place a marker in the same spot. `q` and `-q` are
/// the same rotation.
pub(crate) fn same_placement(a: &Transform, b: &Transform, epsilon: f32) -> bool {
    let dt: Vec3 = a.translation - b.translation;
    let dot = Quat::dot(a.rotation, b.rotation).abs();
    dt.abs().max_element() <= epsilon && 1.0 - dot <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DQuat, DVec3};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_is_inverted_at_the_viewport() {
        let pose = PoseSample::new(DVec3::new(1.0, 2.0, 0.5), DQuat::from_rotation_z(FRAC_PI_2));
        let tf = transform_from_pose(&pose);
        assert!((tf.translation - Vec3::new(1.0, 2.0, 0.5)).length() < 1e-6);
        // The controller stores the inverse of what the viewport draws.
        let x = tf.rotation * Vec3::X;
        assert!((x - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);

        let back = pose_from_transform(&tf);
        assert!(back.approx_eq(&pose, 1e-6));
    }

    #[test]
    fn opposite_quaternions_are_the_same_placement() {
        let a = Transform::from_rotation(Quat::from_rotation_x(0.3));
        let b = Transform::from_rotation(-Quat::from_rotation_x(0.3));
        assert!(same_placement(&a, &b, 1e-5));
        let c = a.with_translation(Vec3::new(0.0, 0.1, 0.0));
        assert!(!same_placement(&a, &c, 1e-5));
    }
}
