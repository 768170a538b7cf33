//! Integration tests for the Alembic core.
//!
//! These exercise the public API end to end: board construction, solving,
//! brew readout and resolution, and the owned game state.

use alembic_core::brew::*;
use alembic_core::config::GameConfig;
use alembic_core::direction::Direction;
use alembic_core::flow::{FlowSolver, solve};
use alembic_core::fluid::{Essence::*, FluidColor};
use alembic_core::grid::PipeGrid;
use alembic_core::id::SourceId;
use alembic_core::state::GameState;
use alembic_core::test_utils::*;
use alembic_core::tile::PipeShape;

// ===========================================================================
// Test 1: Single straight column feeds its sink
// ===========================================================================
//
// N=3, one strength source over column 0, column 0 all vertical straights.
// The sink below it brews strength and the source is spent.

#[test]
fn straight_column_brews_and_exhausts_source() {
    let mut grid = grid_from(&["s0 s1 s1", "s0 s1 s1", "s0 s1 s1"]);
    let mut sources = sources_at(3, &[(0, Strength, 1)]);
    let mut sinks = vec![Sink::default(); 3];

    solve(&mut grid, &sources);
    let outputs = compute_brew_outputs(&grid);
    assert_eq!(
        outputs,
        vec![
            Some(BrewRecord {
                color: strength(),
                sources: [SourceId(1)].into_iter().collect(),
            }),
            None,
            None,
        ]
    );

    let summary = resolve_brew(&outputs, &mut sinks, &mut sources, &BrewTable::default()).unwrap();
    // [2, 0, -1] from zero clamps the negative component.
    assert_eq!(sinks[0].potency, Potency([2, 0, 0]));
    assert!(sinks[1].potency.is_empty());
    assert!(sinks[2].potency.is_empty());

    let spent = sources[0].unwrap();
    assert_eq!(spent.count, 0);
    assert_eq!(spent.color, FluidColor::Spoiled);
    assert!(summary.events.contains(&BrewEvent::SourceExhausted { column: 0 }));
}

// ===========================================================================
// Test 2: No path to the bottom yields no brew
// ===========================================================================

#[test]
fn unreachable_sink_yields_none() {
    // Horizontal straights: the source's flow never enters the board.
    let mut grid = grid_from(&["s1 s1 s1", "s1 s1 s1", "s1 s1 s1"]);
    let sources = sources_at(3, &[(1, Sorcery, 2)]);
    let report = solve(&mut grid, &sources);
    assert_eq!(report.fills, 0);
    assert_eq!(compute_brew_outputs(&grid), vec![None, None, None]);
}

// ===========================================================================
// Test 3: Two sources blend into a sink
// ===========================================================================
//
// Columns 0 and 2 pour down, corners turn both inward, and a T in the
// middle sends the blend down into sink 1.

#[test]
fn blend_reaches_middle_sink() {
    let mut grid = grid_from(&["s0 s1 s0", "c0 t1 c3", "s1 s0 s1"]);
    let sources = sources_at(3, &[(0, Strength, 2), (2, Charisma, 2)]);
    solve(&mut grid, &sources);

    let outputs = compute_brew_outputs(&grid);
    let record = outputs[1].as_ref().expect("middle sink fed");
    assert_eq!(record.color, bloodlust());
    assert_eq!(record.sources, ids(&[0, 2]));
    assert_eq!(outputs[0], None);
    assert_eq!(outputs[2], None);

    // Each side's flow also backs up into the other column.
    assert_eq!(grid.get(2, 0).unwrap().slot(0).color, Some(bloodlust()));
    assert_eq!(grid.get(0, 0).unwrap().slot(0).color, Some(bloodlust()));
}

// ===========================================================================
// Test 4: Cross carries two unrelated flows
// ===========================================================================
//
// Strength turns right into the cross from the left while charisma drops
// straight through it from above.

#[test]
fn cross_routes_are_independent() {
    let mut grid = grid_from(&["s0 s0 s1", "c0 x0 s1", "s1 s0 s1"]);
    let sources = sources_at(3, &[(0, Strength, 1), (1, Charisma, 1)]);
    solve(&mut grid, &sources);

    let cross = grid.get(1, 1).unwrap();
    let down = cross.resolve_entry(Direction::Top).unwrap();
    let across = cross.resolve_entry(Direction::Left).unwrap();
    assert_ne!(down.subset, across.subset);
    assert_eq!(cross.slot(down.subset).color, Some(charisma()));
    assert_eq!(cross.slot(down.subset).contributors, ids(&[1]));
    assert_eq!(cross.slot(across.subset).color, Some(strength()));
    assert_eq!(cross.slot(across.subset).contributors, ids(&[0]));

    let outputs = compute_brew_outputs(&grid);
    assert_eq!(outputs[1].as_ref().map(|r| r.color), Some(charisma()));
}

// ===========================================================================
// Test 5: Determinism across solver instances
// ===========================================================================

#[test]
fn repeated_solves_are_identical() {
    let base = random_grid(8, 99);
    let sources = sources_at(8, &[(0, Strength, 1), (3, Charisma, 2), (6, Sorcery, 3)]);

    let mut a = base.clone();
    let mut b = base.clone();
    let mut solver = FlowSolver::new();
    let ra = solver.solve(&mut a, &sources);
    let rb = solve(&mut b, &sources);
    let rc = solver.solve(&mut a, &sources);

    assert_eq!(ra, rb);
    assert_eq!(ra, rc);
    assert_eq!(a, b);
    assert_eq!(compute_brew_outputs(&a), compute_brew_outputs(&b));
}

// ===========================================================================
// Test 6: Rotation changes flow only after a re-solve
// ===========================================================================

#[test]
fn rotation_requires_resolve() {
    let mut grid = grid_from(&["s0 s1", "s0 s1"]);
    let sources = sources_at(2, &[(0, Sorcery, 1)]);
    solve(&mut grid, &sources);
    assert!(compute_brew_outputs(&grid)[0].is_some());

    grid.rotate_tile(0, 0, 1).unwrap();
    // Stale fill still reports the old brew.
    assert!(compute_brew_outputs(&grid)[0].is_some());

    solve(&mut grid, &sources);
    assert_eq!(compute_brew_outputs(&grid)[0], None);
}

// ===========================================================================
// Test 7: Ring of corners terminates
// ===========================================================================

#[test]
fn corner_ring_terminates() {
    // c1 joins RIGHT+BOTTOM, c2 BOTTOM+LEFT, c3 LEFT+TOP, c0 TOP+RIGHT.
    // The top-left merge feeds the ring.
    let mut grid = grid_from(&["m0 c2", "c0 c3"]);
    let report = solve(&mut grid, &sources_at(2, &[(0, Charisma, 1)]));
    assert!(report.fills >= 4);
    for (_, tile) in grid.tiles() {
        assert!(tile.lit_subsets().next().is_some());
    }
}

// ===========================================================================
// Test 8: Full game over several days
// ===========================================================================

#[test]
fn game_plays_several_days() {
    let mut game = GameState::new(GameConfig::default(), 2024).unwrap();
    for _ in 0..10 {
        let before: u32 = game.sources().iter().flatten().map(|s| s.count).sum();
        let report = game.next_day().unwrap();
        let after: u32 = game.sources().iter().flatten().map(|s| s.count).sum();
        // Each used source loses exactly one use.
        assert_eq!(before - after, report.brew.used.len() as u32);
    }
    assert_eq!(game.turns(), 10);
    for sink in game.sinks() {
        for v in sink.potency.0 {
            assert!(v <= BrewTable::DEFAULT_MAX_POTENCY);
        }
    }
}

// ===========================================================================
// Test 9: Grid construction errors
// ===========================================================================

#[test]
fn ragged_rows_rejected() {
    let rows = vec![
        vec![tile(PipeShape::Cross, 0), tile(PipeShape::Cross, 0)],
        vec![tile(PipeShape::Cross, 0)],
    ];
    assert!(PipeGrid::from_rows(rows).is_err());
}
