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

//! Ready-made [StepVisitor] implementations for the common trace shapes:
//! recording every visited cell, and stopping at the first solid cell.

use cgmath::Vector3;

use crate::coordinates::BlockCoordinate;
use crate::raycast::{GridTracer, StepVisitor, TraceStep};

/// Records every step of a run, in visit order.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<TraceStep>,
}

impl StepRecorder {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<TraceStep> {
        self.steps
    }
}

impl StepVisitor for StepRecorder {
    fn on_step(&mut self, step: &TraceStep) -> bool {
        self.steps.push(*step);
        true
    }
}

/// Stops the run at the first cell the predicate reports as solid and keeps
/// that step as the hit.
pub struct CollisionTrace<F> {
    is_solid: F,
    hit: Option<TraceStep>,
}

impl<F: FnMut(BlockCoordinate) -> bool> CollisionTrace<F> {
    pub fn new(is_solid: F) -> Self {
        Self { is_solid, hit: None }
    }

    /// The step at which a solid cell was found, if any. The step's offsets
    /// are the entry point into that cell.
    pub fn hit(&self) -> Option<&TraceStep> {
        self.hit.as_ref()
    }
}

impl<F: FnMut(BlockCoordinate) -> bool> StepVisitor for CollisionTrace<F> {
    fn on_step(&mut self, step: &TraceStep) -> bool {
        if (self.is_solid)(step.block) {
            self.hit = Some(*step);
            false
        } else {
            true
        }
    }

    fn collides(&self) -> bool {
        self.hit.is_some()
    }
}

/// True iff the segment from `start` to `end` crosses no cell the predicate
/// reports as solid. The cells containing the endpoints are checked too.
pub fn line_of_sight(
    start: Vector3<f64>,
    end: Vector3<f64>,
    is_solid: impl FnMut(BlockCoordinate) -> bool,
) -> bool {
    let mut tracer = GridTracer::new(start, end);
    let mut trace = CollisionTrace::new(is_solid);
    tracer.run(&mut trace);
    !trace.collides()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;
    use rustc_hash::FxHashSet;

    /// A 5x5 wall of solid cells in the x = 5 slab, centered on y = z = 0.
    fn wall_world() -> FxHashSet<BlockCoordinate> {
        let mut solid = FxHashSet::default();
        let center = BlockCoordinate::new(5, 0, 0);
        for dy in -2..=2 {
            for dz in -2..=2 {
                solid.insert(center.try_delta(0, dy, dz).unwrap());
            }
        }
        solid
    }

    #[test]
    fn collision_trace_stops_at_the_wall() {
        let solid = wall_world();
        let mut tracer = GridTracer::new(vec3(0.5, 0.5, 0.5), vec3(10.5, 0.5, 0.5));
        let mut trace = CollisionTrace::new(|block| solid.contains(&block));
        tracer.run(&mut trace);

        assert!(trace.collides());
        let hit = trace.hit().unwrap();
        assert_eq!(hit.block, BlockCoordinate::new(5, 0, 0));
        assert_eq!(hit.index, 6);
        // Nothing beyond the wall was visited.
        assert_eq!(tracer.steps_done(), 6);
        assert!(!tracer.is_end_block());
    }

    #[test]
    fn line_of_sight_through_and_around_the_wall() {
        let solid = wall_world();
        assert!(!line_of_sight(
            vec3(0.5, 0.5, 0.5),
            vec3(10.5, 0.5, 0.5),
            |block| solid.contains(&block)
        ));
        // Passing over the wall clears it.
        assert!(line_of_sight(
            vec3(0.5, 4.5, 0.5),
            vec3(10.5, 4.5, 0.5),
            |block| solid.contains(&block)
        ));
    }

    #[test]
    fn line_of_sight_checks_the_degenerate_cell() {
        let solid = wall_world();
        let inside = vec3(5.5, 0.5, 0.5);
        assert!(!line_of_sight(inside, inside, |block| solid.contains(&block)));
        assert!(line_of_sight(inside, inside, |_| false));
    }

    #[test]
    fn recorder_reports_no_collision() {
        let mut tracer = GridTracer::new(vec3(0.5, 0.5, 0.5), vec3(3.5, 0.5, 0.5));
        let mut recorder = StepRecorder::default();
        tracer.run(&mut recorder);
        assert_eq!(recorder.steps().len(), 4);
        assert!(!recorder.collides());
    }
}
