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

//! Incremental traversal of the grid cells crossed by a line segment.
//! The segment is walked in normalized time t in [0, 1]; each iteration
//! advances to the nearest cell boundary on any axis and reports the cell
//! being left, together with the sub-cell entry offsets.


use cgmath::Vector3;

use crate::coordinates::{loc_to_block, BlockCoordinate};

/// State of one traversal step, as observed before the tracer advances into
/// the next cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStep {
    /// The cell the tracer occupies during this step.
    pub block: BlockCoordinate,
    /// Position within the cell per axis, in [0, 1] from the minimum corner.
    pub offset: Vector3<f64>,
    /// Normalized duration of this step (fraction of the whole segment).
    /// Zero for degenerate segments and for the trailing crossings of a
    /// multi-axis boundary tie.
    pub duration: f64,
    /// 1-based step number since the last `set`. Equal to what
    /// [GridTracer::steps_done] would report from within this step.
    pub index: usize,
}

/// Per-cell callback that a [GridTracer] run is driven through.
///
/// Any `FnMut(&TraceStep) -> bool` closure is a visitor; implement the trait
/// directly when the caller needs to carry state such as a collision result.
pub trait StepVisitor {
    /// Called once per step with the pre-advance state. Return false to
    /// abort the run immediately.
    fn on_step(&mut self, step: &TraceStep) -> bool;

    /// Whether a collision was observed during the run. Implementations that
    /// detect collisions track the result themselves; the default reports
    /// none.
    fn collides(&self) -> bool {
        false
    }
}

impl<F: FnMut(&TraceStep) -> bool> StepVisitor for F {
    fn on_step(&mut self, step: &TraceStep) -> bool {
        self(step)
    }
}

/// Fraction of the remaining normalized progress needed to reach the next
/// cell boundary along one axis, given the total delta and the current
/// within-cell offset on that axis. Infinite if the axis has no movement.
#[inline]
fn t_diff(d_total: f64, offset: f64) -> f64 {
    if d_total > 0.0 {
        if offset >= 1.0 {
            // Already on the boundary, e.g. entering it via a diagonal tie.
            0.0
        } else {
            (1.0 - offset) / d_total
        }
    } else if d_total < 0.0 {
        if offset <= 0.0 {
            0.0
        } else {
            offset / -d_total
        }
    } else {
        f64::INFINITY
    }
}

/// Crosses the boundary on one axis: snaps the offset to the entry edge of
/// the neighboring cell and moves the block index one unit toward the end
/// block. No-op once the axis has reached its end index, or if it has no
/// movement.
#[inline]
fn cross_axis(d_total: f64, offset: &mut f64, block: &mut i32, end_block: i32) -> bool {
    if *block == end_block {
        return false;
    }
    if d_total < 0.0 {
        *offset = 1.0;
        *block -= 1;
        true
    } else if d_total > 0.0 {
        *offset = 0.0;
        *block += 1;
        true
    } else {
        false
    }
}

/// Walks the grid cells crossed by a line segment, in order.
///
/// The tracer is a reusable instance: [GridTracer::set] fully replaces the
/// traversal state, and [GridTracer::run] drives it to completion, invoking
/// a [StepVisitor] once per cell crossing (exactly once for a zero-length
/// segment). At most one axis crosses its boundary per step; when several
/// axes reach a boundary in the same normalized instant, x is crossed before
/// y before z, and the remaining crossings follow as separate zero-duration
/// steps.
pub struct GridTracer {
    /// Distance per axis, end minus start.
    delta: Vector3<f64>,
    /// Current block.
    block: BlockCoordinate,
    /// End block.
    end_block: BlockCoordinate,
    /// Offset within the current block, each component in [0, 1].
    offset: Vector3<f64>,
    /// Normalized progress in [0, 1].
    t: f64,
    /// Tolerance for the arrival check: 1 - t <= tol counts as arrived.
    tol: f64,
    /// Steps done since the last set. Incremented before the visitor fires.
    step: usize,
    /// Maximum number of steps that run will do.
    max_steps: usize,
}

impl GridTracer {
    pub fn new(start: Vector3<f64>, end: Vector3<f64>) -> Self {
        let mut result = Self {
            delta: Vector3::new(0.0, 0.0, 0.0),
            block: BlockCoordinate::new(0, 0, 0),
            end_block: BlockCoordinate::new(0, 0, 0),
            offset: Vector3::new(0.0, 0.0, 0.0),
            t: 0.0,
            tol: 0.0,
            step: 0,
            max_steps: usize::MAX,
        };
        result.set(start, end);
        result
    }

    /// Replaces the traversal state with a fresh segment. After this, `run`
    /// starts over from the new start point; the step count is zeroed and
    /// nothing carries over from a previous traversal.
    pub fn set(&mut self, start: Vector3<f64>, end: Vector3<f64>) {
        self.delta = end - start;
        self.block = BlockCoordinate::new(
            loc_to_block(start.x),
            loc_to_block(start.y),
            loc_to_block(start.z),
        );
        self.end_block = BlockCoordinate::new(
            loc_to_block(end.x),
            loc_to_block(end.y),
            loc_to_block(end.z),
        );
        self.offset = Vector3::new(
            start.x - self.block.x as f64,
            start.y - self.block.y as f64,
            start.z - self.block.z as f64,
        );
        self.t = 0.0;
        self.step = 0;
    }

    /// Loops through the cells crossed by the segment, visiting each in
    /// order. Terminates on arrival within tolerance, on a visitor veto, on
    /// the step cap, or once no axis can make further progress.
    pub fn run<V: StepVisitor + ?Sized>(&mut self, visitor: &mut V) {
        while 1.0 - self.t > self.tol {
            // Smallest time to a cell boundary across the three axes.
            let t_x = t_diff(self.delta.x, self.offset.x);
            let t_y = t_diff(self.delta.y, self.offset.y);
            let t_z = t_diff(self.delta.z, self.offset.z);
            let mut t_min = t_x.min(t_y).min(t_z);
            if t_min.is_infinite() {
                // No axis has any distance left (zero-length segment). The
                // starting cell still gets its single visit.
                if self.step >= 1 {
                    break;
                }
                t_min = 0.0;
            }
            if self.t + t_min > 1.0 {
                // Cap at the remaining distance to the segment end.
                t_min = 1.0 - self.t;
            }

            self.step += 1;
            let step = TraceStep {
                block: self.block,
                offset: self.offset,
                duration: t_min,
                index: self.step,
            };
            if !visitor.on_step(&step) {
                break;
            }
            if self.t + t_min >= 1.0 - self.tol {
                break;
            }

            self.offset.x = (self.offset.x + t_min * self.delta.x).clamp(0.0, 1.0);
            self.offset.y = (self.offset.y + t_min * self.delta.y).clamp(0.0, 1.0);
            self.offset.z = (self.offset.z + t_min * self.delta.z).clamp(0.0, 1.0);

            // Cross exactly one boundary, x before y before z on exact ties.
            let mut changed = t_x == t_min
                && cross_axis(
                    self.delta.x,
                    &mut self.offset.x,
                    &mut self.block.x,
                    self.end_block.x,
                );
            if !changed {
                changed = t_y == t_min
                    && cross_axis(
                        self.delta.y,
                        &mut self.offset.y,
                        &mut self.block.y,
                        self.end_block.y,
                    );
            }
            if !changed {
                changed = t_z == t_min
                    && cross_axis(
                        self.delta.z,
                        &mut self.offset.z,
                        &mut self.block.z,
                        self.end_block.z,
                    );
            }

            self.t += t_min;
            if !changed {
                break;
            }
            if self.step >= self.max_steps {
                log::debug!("Grid trace stopped at the step cap ({})", self.max_steps);
                break;
            }
        }
    }

    /// True iff the current block is the block containing the end point,
    /// regardless of how much of the segment has been traversed.
    pub fn is_end_block(&self) -> bool {
        self.block == self.end_block
    }

    /// Number of steps done since the last `set`. After `run` returns this
    /// is the total number of visitor invocations performed.
    pub fn steps_done(&self) -> usize {
        self.step
    }

    pub fn current_block(&self) -> BlockCoordinate {
        self.block
    }

    pub fn end_block(&self) -> BlockCoordinate {
        self.end_block
    }

    /// Maximum number of steps that `run` will do. Defaults to unbounded.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    pub fn tolerance(&self) -> f64 {
        self.tol
    }

    /// Sets the slack near t = 1 within which the traversal counts as
    /// arrived. Must be non-negative.
    pub fn set_tolerance(&mut self, tol: f64) {
        self.tol = tol;
    }
}

impl Default for GridTracer {
    /// A tracer over the degenerate zero-length segment at the origin.
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0))
    }
}
