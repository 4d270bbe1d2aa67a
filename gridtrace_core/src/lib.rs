// Copyright 2023 drey7925
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Grid ray tracing for voxel worlds: walks the integer cells a continuous
//! line segment passes through, in order, with sub-cell offsets preserved
//! between visits. This is the shared primitive behind collision, visibility
//! and movement checks; it reports coordinates and offsets to its caller and
//! owns no per-cell data itself.

pub mod coordinates;
pub mod raycast;
pub mod visitors;
