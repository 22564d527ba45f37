use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing (first reveal)
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> NotStarted (restart)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// The game has ended and no moves are accepted anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn outcome(self) -> Option<GameOutcome> {
        match self {
            Self::Won => Some(GameOutcome::Won),
            Self::Lost => Some(GameOutcome::Lost),
            Self::NotStarted | Self::Playing => None,
        }
    }
}

/// One player's game from configuration to the end, and across restarts.
///
/// The mine layout is only built on the first reveal so the clicked cell can be kept safe. Moves that make no sense
/// (revealing a flag, flagging an open cell or flagging before the first reveal, anything after the game ended) are
/// accepted and ignored, only coordinates outside the board are errors.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    state: SessionState,
    layout: Option<MineLayout>,
    cells: CellStore,
    clock: GameClock,
    rng: SmallRng,
    board_seed: Option<u64>,
}

impl GameSession {
    /// The seed drives the placement of every game played in this session.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::NotStarted,
            layout: None,
            cells: CellStore::new(config.grid(), config.flag_policy),
            clock: GameClock::new(),
            rng: SmallRng::seed_from_u64(seed),
            board_seed: None,
        })
    }

    /// Session whose first game uses `layout` instead of a generated one. Later games after a restart are random.
    pub fn with_layout(layout: MineLayout, flag_policy: FlagPolicy, seed: u64) -> Result<Self> {
        let config =
            GameConfig::new(layout.size(), layout.mine_count())?.with_flag_policy(flag_policy);
        let mut session = Self::new(config, seed)?;
        session.layout = Some(layout);
        Ok(session)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn grid(&self) -> Grid {
        self.config.grid()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.clock.elapsed_secs()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    /// `None` until the first reveal of a game.
    pub fn layout(&self) -> Option<&MineLayout> {
        self.layout.as_ref().filter(|_| !self.state.is_ready())
    }

    /// Seed the current layout was generated from, if it was generated.
    pub fn board_seed(&self) -> Option<u64> {
        self.board_seed
    }

    /// Mines minus flags placed by the player. Advisory only, flags do not have to sit on mines, and the mines
    /// shown as flagged after a win do not count.
    pub fn remaining_mines(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.cells.flag_count())
    }

    /// [`GameSession::remaining_mines`] clamped into the three digit counter range.
    pub fn remaining_mines_display(&self) -> u16 {
        self.remaining_mines().clamp(0, 999) as u16
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<EngineCell> {
        let coords = self.grid().validate_coords(coords)?;
        Ok(self.cells.cell_at(coords))
    }

    /// What to draw at `coords`, including the mine and misflag reveals once the game is over.
    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.grid().validate_coords(coords)?;
        Ok(self.view_at(coords))
    }

    pub fn reveal<O>(&mut self, coords: Coord2, observer: &mut O) -> Result<RevealOutcome>
    where
        O: GameObserver + ?Sized,
    {
        let coords = self.grid().validate_coords(coords)?;

        if self.state.is_finished() || !self.cells.cell_at(coords).is_revealable() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.is_ready() {
            self.start(coords, observer)?;
        }

        let Some(layout) = self.layout.as_ref() else {
            return Ok(RevealOutcome::NoChange);
        };
        let outcome = RevealEngine::new(layout, &mut self.cells).reveal_from(coords, observer)?;

        if let Some(game_outcome) = outcome.game_outcome() {
            self.finish(game_outcome, observer);
        }
        Ok(outcome)
    }

    pub fn toggle_flag<O>(&mut self, coords: Coord2, observer: &mut O) -> Result<MarkOutcome>
    where
        O: GameObserver + ?Sized,
    {
        let coords = self.grid().validate_coords(coords)?;

        if !self.state.is_playing() {
            return Ok(MarkOutcome::NoChange);
        }

        let flags_before = self.cells.flag_count();
        let outcome = self.cells.toggle_flag(coords);
        if outcome.has_update() {
            observer.on_cell_flagged(coords, self.cells.cell_at(coords).mark());
            if self.cells.flag_count() != flags_before {
                observer.on_remaining_mines_changed(self.remaining_mines());
            }
        }
        Ok(outcome)
    }

    /// Throws away the current game, legal in any state.
    pub fn restart<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        if self.clock.reset() {
            observer.on_clock_stopped();
        }
        self.state = SessionState::NotStarted;
        self.layout = None;
        self.board_seed = None;
        self.cells = CellStore::new(self.config.grid(), self.config.flag_policy);
        log::debug!("Restarted with {:?}", self.config);

        observer.on_restarted(self.config);
        observer.on_remaining_mines_changed(self.remaining_mines());
        observer.on_tick(0);
    }

    /// Switches to another board configuration, restarting the game.
    pub fn reconfigure<O>(&mut self, config: GameConfig, observer: &mut O) -> Result<()>
    where
        O: GameObserver + ?Sized,
    {
        config.validate()?;
        self.config = config;
        self.restart(observer);
        Ok(())
    }

    /// Feeds one scheduled second into the clock. Returns `false` for ticks that were ignored.
    pub fn tick<O>(&mut self, epoch: TickEpoch, observer: &mut O) -> bool
    where
        O: GameObserver + ?Sized,
    {
        match self.clock.tick(epoch) {
            Some(elapsed) => {
                observer.on_tick(elapsed);
                true
            }
            None => false,
        }
    }

    fn start<O>(&mut self, origin: Coord2, observer: &mut O) -> Result<()>
    where
        O: GameObserver + ?Sized,
    {
        if self.layout.is_none() {
            let seed = self.rng.random();
            let layout = RandomMinefieldGenerator::new(seed, origin).generate(self.config)?;
            self.layout = Some(layout);
            self.board_seed = Some(seed);
        }

        self.state = SessionState::Playing;
        let epoch = self.clock.start();
        log::debug!("Game started at {:?}", origin);
        observer.on_clock_started(epoch);
        Ok(())
    }

    fn finish<O>(&mut self, outcome: GameOutcome, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        self.state = match outcome {
            GameOutcome::Won => SessionState::Won,
            GameOutcome::Lost => SessionState::Lost,
        };
        if self.clock.stop() {
            observer.on_clock_stopped();
        }
        log::debug!(
            "Game {:?} after {} seconds",
            outcome,
            self.clock.elapsed_secs()
        );
        observer.on_game_ended(outcome);

        for coords in self.grid().iter_coords() {
            match self.view_at(coords) {
                CellView::Flagged if !self.cells.is_flagged(coords) => {
                    observer.on_cell_flagged(coords, Mark::Flag);
                }
                view @ (CellView::Mine | CellView::Misflagged) => {
                    observer.on_cell_revealed(coords, view);
                }
                _ => {}
            }
        }
    }

    fn view_at(&self, coords: Coord2) -> CellView {
        use EngineCell::*;
        use SessionState::*;

        let has_mine = self
            .layout()
            .is_some_and(|layout| layout.contains_mine(coords));

        match (self.state, self.cells.cell_at(coords)) {
            (_, Exploded) => CellView::TriggeredMine,
            (_, Revealed(count)) => CellView::Revealed(count),
            (Won, _) if has_mine => CellView::Flagged,
            (Lost, Flagged) if has_mine => CellView::Flagged,
            (Lost, _) if has_mine => CellView::Mine,
            (Won | Lost, Flagged) => CellView::Misflagged,
            (_, Flagged) => CellView::Flagged,
            (_, Guessed) => CellView::Guessed,
            (_, Hidden) => CellView::Hidden,
        }
    }
}
