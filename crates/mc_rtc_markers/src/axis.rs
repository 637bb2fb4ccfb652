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

use glam::DVec3;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Which handles an interactive marker exposes in the viewport.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ControlAxis: u8 {
        const TX = 1 << 0;
        const TY = 1 << 1;
        const TZ = 1 << 2;
        const RX = 1 << 3;
        const RY = 1 << 4;
        const RZ = 1 << 5;
        const TRANSLATION = Self::TX.bits() | Self::TY.bits() | Self::TZ.bits();
        const ROTATION = Self::RX.bits() | Self::RY.bits() | Self::RZ.bits();
        const XYTHETA = Self::TX.bits() | Self::TY.bits() | Self::RZ.bits();
        const XYZTHETA = Self::TX.bits() | Self::TY.bits() | Self::TZ.bits() | Self::RZ.bits();
        const ALL = Self::TRANSLATION.bits() | Self::ROTATION.bits();
    }
}

/// A single manipulation handle of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisHandle {
    TranslateX,
    TranslateY,
    TranslateZ,
    RotateX,
    RotateY,
    RotateZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Arrow constrained to move along the axis
    Translate,
    /// Dial constrained to turn around the axis
    Rotate,
}

const HANDLES: [(ControlAxis, AxisHandle); 6] = [
    (ControlAxis::RX, AxisHandle::RotateX),
    (ControlAxis::RY, AxisHandle::RotateY),
    (ControlAxis::RZ, AxisHandle::RotateZ),
    (ControlAxis::TX, AxisHandle::TranslateX),
    (ControlAxis::TY, AxisHandle::TranslateY),
    (ControlAxis::TZ, AxisHandle::TranslateZ),
];

impl ControlAxis {
    /// Iterate over the individual handles, rotations first.
    pub fn handles(self) -> impl Iterator<Item = AxisHandle> {
        HANDLES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, handle)| handle)
    }
}

impl AxisHandle {
    pub fn kind(&self) -> HandleKind {
        match self {
            Self::TranslateX | Self::TranslateY | Self::TranslateZ => HandleKind::Translate,
            Self::RotateX | Self::RotateY | Self::RotateZ => HandleKind::Rotate,
        }
    }

    /// Unit vector of the axis in the marker's local frame.
    pub fn direction(&self) -> DVec3 {
        match self {
            Self::TranslateX | Self::RotateX => DVec3::X,
            Self::TranslateY | Self::RotateY => DVec3::Y,
            Self::TranslateZ | Self::RotateZ => DVec3::Z,
        }
    }

    pub fn flag(&self) -> ControlAxis {
        match self {
            Self::TranslateX => ControlAxis::TX,
            Self::TranslateY => ControlAxis::TY,
            Self::TranslateZ => ControlAxis::TZ,
            Self::RotateX => ControlAxis::RX,
            Self::RotateY => ControlAxis::RY,
            Self::RotateZ => ControlAxis::RZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_cover_expected_handles() {
        let xytheta: Vec<_> = ControlAxis::XYTHETA.handles().collect();
        assert_eq!(
            xytheta,
            vec![
                AxisHandle::RotateZ,
                AxisHandle::TranslateX,
                AxisHandle::TranslateY
            ]
        );
        assert_eq!(ControlAxis::ALL.handles().count(), 6);
        assert_eq!(ControlAxis::empty().handles().count(), 0);
        assert!(ControlAxis::XYZTHETA.contains(ControlAxis::TZ));
        assert!(!ControlAxis::XYZTHETA.intersects(ControlAxis::RX | ControlAxis::RY));
    }

    #[test]
    fn handles_round_trip_to_flags() {
        for handle in ControlAxis::ALL.handles() {
            assert_eq!(handle.flag().handles().next(), Some(handle));
        }
        assert_eq!(AxisHandle::RotateY.kind(), HandleKind::Rotate);
        assert_eq!(AxisHandle::TranslateZ.direction(), DVec3::Z);
    }
}
