//! The exclusively owned state of one game and its day cycle.
//!
//! [`GameState`] bundles the board, sources, sinks, and RNG that the flow
//! and brew functions operate on, and sequences them the way a turn plays
//! out: the player rotates tiles (re-solving to see the result), then ends
//! the day, which brews, lays out fresh pipes, and grants a mulligan.

use crate::brew::{
    BrewError, BrewRecord, BrewSummary, Potency, Sink, compute_brew_outputs, preview_brew,
    resolve_brew,
};
use crate::config::{ConfigError, GameConfig};
use crate::flow::{FlowReport, FlowSolver};
use crate::fluid::Essence;
use crate::grid::{GridError, PipeGrid};
use crate::rng::SimRng;
use crate::source::Source;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Brew(#[from] BrewError),
    #[error("no mulligans left")]
    NoMulligans,
    #[error("column {column} is outside a {dim}-wide board")]
    ColumnOutOfRange { column: usize, dim: usize },
}

/// What ending a day did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    /// Turn number after the day ended.
    pub turn: u32,
    /// Spent sources removed before brewing.
    pub cleared: usize,
    /// Hop distance the drain animation must cover, from the solve that
    /// fed the brew.
    pub drain_distance: u32,
    pub brew: BrewSummary,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) grid: PipeGrid,
    pub(crate) sources: Vec<Option<Source>>,
    pub(crate) sinks: Vec<Sink>,
    pub(crate) rng: SimRng,
    pub(crate) mulligans: u32,
    pub(crate) turns: u32,
    pub(crate) flow: FlowReport,
    pub(crate) solver: FlowSolver,
}

impl GameState {
    /// Start a new game: random layout, the starting essences shuffled
    /// across the source columns, and empty sinks.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, StateError> {
        config.validate()?;
        let mut rng = SimRng::new(seed);
        let grid = PipeGrid::generate(config.dim, &config.distribution, &mut rng)?;

        let mut counts = config.starting_counts.clone();
        rng.shuffle(&mut counts);
        let mut sources: Vec<Option<Source>> = vec![None; config.dim];
        for (i, count) in counts.into_iter().enumerate() {
            sources[i] = Essence::from_index(i as u8).map(|e| Source::new(e, count));
        }
        rng.shuffle(&mut sources);

        let mut state = Self {
            grid,
            sources,
            sinks: vec![Sink::default(); config.dim],
            rng,
            mulligans: config.initial_mulligans,
            turns: 0,
            flow: FlowReport::default(),
            solver: FlowSolver::new(),
            config,
        };
        state.solve();
        log::info!("new {0}x{0} game, seed {seed}", state.config.dim);
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &PipeGrid {
        &self.grid
    }

    pub fn sources(&self) -> &[Option<Source>] {
        &self.sources
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn mulligans(&self) -> u32 {
        self.mulligans
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Report from the most recent solve.
    pub fn last_flow(&self) -> FlowReport {
        self.flow
    }

    /// Recompute flow over the current board and sources.
    pub fn solve(&mut self) -> FlowReport {
        self.flow = self.solver.solve(&mut self.grid, &self.sources);
        self.flow
    }

    /// Turn a tile. Like [`PipeGrid::rotate_tile`], this does not re-solve.
    pub fn rotate(&mut self, x: usize, y: usize, delta: i32) -> Result<(), StateError> {
        self.grid.rotate_tile(x, y, delta)?;
        Ok(())
    }

    /// Replace the source above `column`. Does not re-solve.
    pub fn set_source(&mut self, column: usize, source: Option<Source>) -> Result<(), StateError> {
        let dim = self.config.dim;
        let slot = self
            .sources
            .get_mut(column)
            .ok_or(StateError::ColumnOutOfRange { column, dim })?;
        *slot = source;
        Ok(())
    }

    /// What each sink would brew from the last solve.
    pub fn brew_outputs(&self) -> Vec<Option<BrewRecord>> {
        compute_brew_outputs(&self.grid)
    }

    /// Sink potencies after a brew of the last solve, without brewing.
    pub fn preview(&self) -> Vec<Potency> {
        preview_brew(&self.brew_outputs(), &self.sinks, &self.config.brew)
    }

    /// Solve, then brew. The solve guarantees the brew reads fresh flow.
    pub fn brew(&mut self) -> Result<BrewSummary, StateError> {
        self.solve();
        let outputs = self.brew_outputs();
        let summary = resolve_brew(
            &outputs,
            &mut self.sinks,
            &mut self.sources,
            &self.config.brew,
        )?;
        Ok(summary)
    }

    /// Remove sources whose count reached zero on an earlier brew.
    pub fn clear_spent_sources(&mut self) -> usize {
        let mut cleared = 0;
        for slot in &mut self.sources {
            if slot.is_some_and(|s| s.is_exhausted()) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Spend a mulligan on a fresh pipe layout.
    pub fn reroll_layout(&mut self) -> Result<FlowReport, StateError> {
        if self.mulligans == 0 {
            return Err(StateError::NoMulligans);
        }
        self.mulligans -= 1;
        self.new_layout()?;
        log::info!("layout rerolled, {} mulligans left", self.mulligans);
        Ok(self.solve())
    }

    /// End the day: clear spent sources, brew, lay out new pipes, grant a
    /// mulligan, and advance the turn counter.
    pub fn next_day(&mut self) -> Result<DayReport, StateError> {
        let cleared = self.clear_spent_sources();
        let brew = self.brew()?;
        let drain_distance = self.flow.max_distance;

        self.new_layout()?;
        self.mulligans = (self.mulligans + 1).min(self.config.max_mulligans);
        self.turns += 1;
        self.solve();

        log::info!(
            "day {} done: {} sinks brewed, {} sources used",
            self.turns,
            brew.brewed,
            brew.used.len()
        );
        Ok(DayReport {
            turn: self.turns,
            cleared,
            drain_distance,
            brew,
        })
    }

    fn new_layout(&mut self) -> Result<(), StateError> {
        self.grid = PipeGrid::generate(self.config.dim, &self.config.distribution, &mut self.rng)?;
        Ok(())
    }
}
