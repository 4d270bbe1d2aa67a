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

use std::fmt::Debug;

use anyhow::{ensure, Result};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordinateError {
    #[error("Coordinate {0} is not finite")]
    NotFinite(f64),
    #[error("Coordinate {0} does not fit into the i32 block range")]
    OutOfBounds(f64),
}

/// Maps a continuous coordinate to the index of the block containing it.
///
/// This is a plain floor (largest integer <= coord), so a block with index n
/// covers the half-open interval [n, n+1). Within-block offsets are computed
/// as `coord - loc_to_block(coord) as f64` and land in [0, 1). Saturates at
/// the i32 range.
#[inline]
pub fn loc_to_block(coord: f64) -> i32 {
    coord.floor() as i32
}

/// A block (cell) position in the world grid.
///
/// Note that the impls of PartialOrd and Ord are meant for tiebreaking (e.g. for sorted data structures) and don't
/// have a lot of semantic meaning on their own.
#[derive(PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct BlockCoordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Debug for BlockCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{}, {}, {}]", self.x, self.y, self.z))
    }
}

impl BlockCoordinate {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Adds the given offset to the coordinate, and returns it, if no
    /// component overflowed.
    pub fn try_delta(&self, x: i32, y: i32, z: i32) -> Option<BlockCoordinate> {
        let x = self.x.checked_add(x)?;
        let y = self.y.checked_add(y)?;
        let z = self.z.checked_add(z)?;

        Some(BlockCoordinate { x, y, z })
    }

    /// Returns the Manhattan distance between the two coordinates
    pub fn manhattan_distance(&self, other: BlockCoordinate) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
            .saturating_add(self.z.abs_diff(other.z))
    }
}

impl From<BlockCoordinate> for cgmath::Vector3<f64> {
    /// The minimum corner of the block, as a continuous position.
    fn from(val: BlockCoordinate) -> Self {
        cgmath::Vector3::new(val.x as f64, val.y as f64, val.z as f64)
    }
}

#[inline]
fn try_convert(value: f64) -> Result<i32> {
    ensure!(value.is_finite(), CoordinateError::NotFinite(value));
    ensure!(
        value <= (i32::MAX as f64) && value >= (i32::MIN as f64),
        CoordinateError::OutOfBounds(value)
    );
    Ok(loc_to_block(value))
}

impl TryFrom<cgmath::Vector3<f64>> for BlockCoordinate {
    type Error = anyhow::Error;

    /// Checked variant of flooring a continuous position component-wise;
    /// rejects non-finite and out-of-range components instead of saturating.
    fn try_from(value: cgmath::Vector3<f64>) -> std::result::Result<Self, Self::Error> {
        Ok(BlockCoordinate {
            x: try_convert(value.x)?,
            y: try_convert(value.y)?,
            z: try_convert(value.z)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn loc_to_block_floors() {
        assert_eq!(loc_to_block(0.0), 0);
        assert_eq!(loc_to_block(0.99), 0);
        assert_eq!(loc_to_block(1.0), 1);
        assert_eq!(loc_to_block(-0.5), -1);
        assert_eq!(loc_to_block(-1.0), -1);
        assert_eq!(loc_to_block(-1.01), -2);
    }

    #[test]
    fn checked_conversion_matches_floor() {
        let coord = BlockCoordinate::try_from(vec3(1.5, -0.5, 16.0)).unwrap();
        assert_eq!(coord, BlockCoordinate::new(1, -1, 16));
        assert_eq!(coord.x, loc_to_block(1.5));
    }

    #[test]
    fn checked_conversion_rejects_bad_input() {
        assert!(BlockCoordinate::try_from(vec3(f64::NAN, 0.0, 0.0)).is_err());
        assert!(BlockCoordinate::try_from(vec3(0.0, f64::INFINITY, 0.0)).is_err());
        assert!(BlockCoordinate::try_from(vec3(0.0, 0.0, 1e10)).is_err());
    }

    #[test]
    fn try_delta_checks_overflow() {
        let coord = BlockCoordinate::new(i32::MAX, 0, 0);
        assert!(coord.try_delta(1, 0, 0).is_none());
        assert_eq!(
            coord.try_delta(-1, 2, 3),
            Some(BlockCoordinate::new(i32::MAX - 1, 2, 3))
        );
    }

    #[test]
    fn manhattan() {
        let a = BlockCoordinate::new(0, 0, 0);
        let b = BlockCoordinate::new(1, -2, 3);
        assert_eq!(a.manhattan_distance(b), 6);
        assert_eq!(b.manhattan_distance(a), 6);
        assert_eq!(a.manhattan_distance(a), 0);
    }
}
