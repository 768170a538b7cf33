//! Flow propagation from the sources through the pipe grid.
//!
//! Every solve starts from a cleared board and walks each active source's
//! flow depth-first from its column on the top row, using an explicit
//! stack. Exits are pushed in reverse so they pop in the order a recursive
//! walk would visit them; contributor sets and distances depend on that
//! order when a blend cancels a later arrival.
//!
//! # Termination
//!
//! A step that reaches a subset already listing its source as a
//! contributor stops immediately. Each (tile, subset, source) triple is
//! therefore expanded at most once, bounding a solve by
//! `dim * dim * 2 * sources` expansions even on boards full of loops.

use crate::direction::Direction;
use crate::fluid::{Absorb, Essence, FluidColor};
use crate::grid::PipeGrid;
use crate::id::SourceId;
use crate::source::Source;

/// One pending arrival of a source's flow at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStep {
    pub x: usize,
    pub y: usize,
    /// Grid-frame edge the flow enters through.
    pub from: Direction,
    pub essence: Essence,
    pub source: SourceId,
    /// Hops from the source's entry cell.
    pub distance: u32,
}

impl FillStep {
    /// The first step of a source pouring into the top of `column`.
    pub fn pour(column: usize, essence: Essence) -> Self {
        Self {
            x: column,
            y: 0,
            from: Direction::Top,
            essence,
            source: SourceId::from_column(column),
            distance: 0,
        }
    }
}

/// Summary of a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowReport {
    /// Sources that poured this solve.
    pub active_sources: usize,
    /// Subset updates applied (cancelled arrivals are not counted).
    pub fills: usize,
    /// Largest hop distance at which any fill happened. Drives how long the
    /// host animates the drain.
    pub max_distance: u32,
}

/// Reusable flow solver. Holds the work stack between solves so repeated
/// solves do not reallocate.
#[derive(Debug, Clone, Default)]
pub struct FlowSolver {
    stack: Vec<FillStep>,
}

impl FlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all fill state and propagate every active source.
    ///
    /// `sources[i]` pours into column `i`. Empty slots, zero-count sources,
    /// and sources without a primary color are skipped.
    pub fn solve(&mut self, grid: &mut PipeGrid, sources: &[Option<Source>]) -> FlowReport {
        grid.clear_fill();
        let mut report = FlowReport::default();

        for (column, slot) in sources.iter().enumerate() {
            let Some(source) = slot else {
                continue;
            };
            if !source.is_active() {
                continue;
            }
            let Some(essence) = source.active_essence() else {
                log::warn!(
                    "source in column {column} carries {:?}, not an essence; skipped",
                    source.color
                );
                continue;
            };
            report.active_sources += 1;
            self.fill(grid, FillStep::pour(column, essence), &mut report);
        }

        log::debug!(
            "flow solved: {} sources, {} fills, max distance {}",
            report.active_sources,
            report.fills,
            report.max_distance
        );
        report
    }

    /// Propagate one arrival and everything downstream of it, without
    /// clearing existing fill state first.
    pub fn fill(&mut self, grid: &mut PipeGrid, start: FillStep, report: &mut FlowReport) {
        self.stack.clear();
        self.stack.push(start);

        while let Some(step) = self.stack.pop() {
            // Off-grid arrivals are the board edge, not an error.
            let Some(tile) = grid.get_mut(step.x, step.y) else {
                continue;
            };
            let Some(entry) = tile.resolve_entry(step.from) else {
                continue;
            };
            let slot = &mut tile.fill[entry.subset];
            if slot.contributors.contains(&step.source) {
                continue;
            }

            let color = match slot.color {
                None => FluidColor::Primary(step.essence),
                Some(existing) => match existing.absorb(step.essence) {
                    Absorb::Become(color) => color,
                    Absorb::Cancel => {
                        log::trace!(
                            "({}, {}) subset {}: {:?} already holds {:?}",
                            step.x,
                            step.y,
                            entry.subset,
                            existing,
                            step.essence
                        );
                        continue;
                    }
                },
            };

            slot.color = Some(color);
            slot.contributors.insert(step.source);
            slot.distance = Some(slot.distance.map_or(step.distance, |d| d.min(step.distance)));
            report.fills += 1;
            report.max_distance = report.max_distance.max(step.distance);
            log::trace!(
                "({}, {}) subset {} <- {:?} at {}: {:?}",
                step.x,
                step.y,
                entry.subset,
                step.source,
                step.distance,
                color
            );

            for dir in entry.onward().rev() {
                if let Some((x, y)) = grid.neighbor(step.x, step.y, dir) {
                    self.stack.push(FillStep {
                        x,
                        y,
                        from: dir.opposite(),
                        distance: step.distance + 1,
                        ..step
                    });
                }
            }
        }
    }
}

/// Solve with a throwaway [`FlowSolver`].
pub fn solve(grid: &mut PipeGrid, sources: &[Option<Source>]) -> FlowReport {
    FlowSolver::new().solve(grid, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid::Essence::*;
    use crate::test_utils::*;

    fn slot_color(grid: &PipeGrid, x: usize, y: usize, subset: usize) -> Option<FluidColor> {
        grid.get(x, y).unwrap().slot(subset).color
    }

    #[test]
    fn straight_column_carries_flow_down() {
        let mut grid = grid_from(&["s0 s0 s0", "s0 s0 s0", "s0 s0 s0"]);
        let report = solve(&mut grid, &sources_at(3, &[(0, Strength, 1)]));

        for y in 0..3 {
            let slot = grid.get(0, y).unwrap().slot(0);
            assert_eq!(slot.color, Some(strength()));
            assert_eq!(slot.contributors, ids(&[0]));
            assert_eq!(slot.distance, Some(y as u32));
        }
        assert!(!grid.get(1, 0).unwrap().slot(0).is_reached());
        assert_eq!(report.active_sources, 1);
        assert_eq!(report.fills, 3);
        assert_eq!(report.max_distance, 2);
    }

    #[test]
    fn dead_end_entry_stops_flow() {
        // Corner at rotation 0 joins TOP and RIGHT, so the straight below it
        // never sees fluid.
        let mut grid = grid_from(&["c0 s1", "s0 s0"]);
        solve(&mut grid, &sources_at(2, &[(0, Charisma, 1)]));
        assert_eq!(slot_color(&grid, 0, 0, 0), Some(charisma()));
        assert_eq!(slot_color(&grid, 0, 1, 0), None);
        // The horizontal straight to the right picks it up.
        assert_eq!(slot_color(&grid, 1, 0, 0), Some(charisma()));
    }

    #[test]
    fn inactive_sources_are_skipped() {
        let mut grid = grid_from(&["s0 s0", "s0 s0"]);
        let mut sources = sources_at(2, &[(0, Strength, 0), (1, Sorcery, 2)]);
        sources.push(None);
        let report = solve(&mut grid, &sources);
        assert_eq!(report.active_sources, 1);
        assert!(!grid.get(0, 0).unwrap().slot(0).is_reached());
        assert!(grid.get(1, 0).unwrap().slot(0).is_reached());
    }

    #[test]
    fn two_essences_blend_where_they_meet() {
        // Merges join all four edges, so both flows reach every tile.
        let mut grid = grid_from(&["m0 m0", "m0 m0"]);
        solve(&mut grid, &sources_at(2, &[(0, Strength, 1), (1, Charisma, 1)]));
        for ((x, y), tile) in grid.tiles() {
            assert_eq!(tile.slot(0).color, Some(bloodlust()), "({x}, {y})");
            assert_eq!(tile.slot(0).contributors, ids(&[0, 1]));
        }
    }

    #[test]
    fn third_essence_spoils_a_blend() {
        let mut grid = grid_from(&["m0 m0 m0", "m0 m0 m0", "m0 m0 m0"]);
        solve(
            &mut grid,
            &sources_at(3, &[(0, Strength, 1), (1, Charisma, 1), (2, Sorcery, 1)]),
        );
        assert!(
            grid.tiles()
                .all(|(_, t)| t.slot(0).color == Some(FluidColor::Spoiled))
        );
    }

    #[test]
    fn redundant_essence_does_not_join_blend() {
        // Column 0 and 2 both pour strength; column 1 pours charisma.
        // Strength fills everything first, charisma blends it, and the
        // second strength source is cancelled everywhere.
        let mut grid = grid_from(&["m0 m0 m0", "m0 m0 m0", "m0 m0 m0"]);
        solve(
            &mut grid,
            &sources_at(3, &[(0, Strength, 1), (1, Charisma, 1), (2, Strength, 1)]),
        );
        for (_, tile) in grid.tiles() {
            assert_eq!(tile.slot(0).color, Some(bloodlust()));
            assert_eq!(tile.slot(0).contributors, ids(&[0, 1]));
        }
    }

    #[test]
    fn same_essence_from_two_sources_unions_contributors() {
        let mut grid = grid_from(&["m0 m0", "m0 m0"]);
        solve(&mut grid, &sources_at(2, &[(0, Sorcery, 1), (1, Sorcery, 3)]));
        let slot = grid.get(1, 1).unwrap().slot(0);
        assert_eq!(slot.color, Some(sorcery()));
        assert_eq!(slot.contributors, ids(&[0, 1]));
    }

    #[test]
    fn corner_ring_terminates() {
        // A merge and three corners close a 2x2 loop: top-right joins
        // LEFT+BOTTOM (rot 2), bottom-right TOP+LEFT (rot 3), bottom-left
        // TOP+RIGHT (rot 0). The flow comes back around into the merge.
        let mut grid = grid_from(&["m0 c2 s0", "c0 c3 s0", "s0 s0 s0"]);
        let report = solve(&mut grid, &sources_at(3, &[(0, Strength, 1)]));
        assert!(report.fills > 0);
        assert_eq!(slot_color(&grid, 1, 1, 0), Some(strength()));
        assert_eq!(slot_color(&grid, 0, 1, 0), Some(strength()));
    }

    #[test]
    fn merge_board_terminates_with_every_source() {
        let mut grid = grid_from(&["m0 m0 m0", "m0 m0 m0", "m0 m0 m0"]);
        let report = solve(
            &mut grid,
            &sources_at(3, &[(0, Sorcery, 1), (1, Sorcery, 1), (2, Sorcery, 1)]),
        );
        // Each of the 9 tiles is reached once per source.
        assert_eq!(report.fills, 27);
    }

    #[test]
    fn distance_keeps_minimum_across_sources() {
        let mut grid = grid_from(&["m0 m0", "m0 m0"]);
        solve(&mut grid, &sources_at(2, &[(0, Strength, 1), (1, Strength, 1)]));
        // (1, 0) is one hop from source 0 and zero hops from source 1.
        assert_eq!(grid.get(1, 0).unwrap().slot(0).distance, Some(0));
    }

    #[test]
    fn revisiting_same_source_is_noop() {
        let mut grid = grid_from(&["s0"]);
        let mut solver = FlowSolver::new();
        let mut report = FlowReport::default();
        let step = FillStep::pour(0, Charisma);
        solver.fill(&mut grid, step, &mut report);
        let before = grid.get(0, 0).unwrap().slot(0).clone();
        solver.fill(&mut grid, step, &mut report);
        assert_eq!(grid.get(0, 0).unwrap().slot(0), &before);
        assert_eq!(report.fills, 1);
    }

    #[test]
    fn cross_keeps_paths_independent() {
        let mut grid = grid_from(&["x0"]);
        let mut solver = FlowSolver::new();
        let mut report = FlowReport::default();
        solver.fill(&mut grid, FillStep::pour(0, Strength), &mut report);
        solver.fill(
            &mut grid,
            FillStep {
                x: 0,
                y: 0,
                from: Direction::Left,
                essence: Charisma,
                source: SourceId(2),
                distance: 0,
            },
            &mut report,
        );
        let tile = grid.get(0, 0).unwrap();
        assert_eq!(tile.slot(0).color, Some(strength()));
        assert_eq!(tile.slot(0).contributors, ids(&[0]));
        assert_eq!(tile.slot(1).color, Some(charisma()));
        assert_eq!(tile.slot(1).contributors, ids(&[1]));
    }

    #[test]
    fn solve_clears_previous_fill() {
        let mut grid = grid_from(&["s0 s0", "s0 s0"]);
        let mut solver = FlowSolver::new();
        solver.solve(&mut grid, &sources_at(2, &[(0, Strength, 1)]));
        grid.rotate_tile(0, 0, 1).unwrap();
        solver.solve(&mut grid, &sources_at(2, &[(0, Strength, 1)]));
        assert!(grid.tiles().all(|(_, t)| t.lit_subsets().count() == 0));
    }

    #[test]
    fn source_beyond_grid_is_ignored() {
        let mut grid = grid_from(&["s0"]);
        let report = solve(&mut grid, &sources_at(3, &[(2, Strength, 1)]));
        assert_eq!(report.active_sources, 1);
        assert_eq!(report.fills, 0);
    }

    #[test]
    fn non_essence_source_is_skipped() {
        let mut grid = grid_from(&["s0"]);
        let sources = vec![Some(Source {
            color: FluidColor::Spoiled,
            count: 2,
        })];
        let report = solve(&mut grid, &sources);
        assert_eq!(report.active_sources, 0);
        assert!(!grid.get(0, 0).unwrap().slot(0).is_reached());
    }
}
