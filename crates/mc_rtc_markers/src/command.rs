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

use crate::{ControlAxis, ElementId, MarkerData, MarkerId, PoseSample};
use serde::{Deserialize, Serialize};

/// Inbound message from the remote controller. These are queued by whatever
/// thread talks to the transport and applied on the tick thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerCommand {
    /// The remote is about to re-send its full list of elements.
    BeginUpdate,
    /// The remote finished sending its list of elements.
    EndUpdate,
    Add {
        element: ElementId,
        axis: ControlAxis,
    },
    Update {
        id: MarkerId,
        read_only: bool,
        pose: PoseSample,
    },
    /// Add the marker if needed, then update it from a widget payload.
    Element {
        element: ElementId,
        read_only: bool,
        data: MarkerData,
    },
    SetHidden {
        id: MarkerId,
        hidden: bool,
    },
    Remove {
        id: MarkerId,
    },
}

/// Outbound message: the user finished moving a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerMoved {
    pub id: MarkerId,
    pub pose: PoseSample,
}
