//! Session state machine - level flow on top of the board simulation.
//!
//! ```text
//!            level complete              continue
//! Playing ───────────────────> LevelComplete ─────────> Playing (level + 1)
//!    │
//!    │ out of moves / time                restart
//!    └───────────────────────> GameOver ────────────> Playing (level 1)
//!
//! any phase ── quit ──> Quit
//! ```
//!
//! The modal phases only react to continue / restart / quit; the frame loop
//! keeps running and checks [`Session::is_quit`] every frame.

use crate::core::{
    obstacles_for_level, BoardError, Budget, CascadeError, CoreError, DifficultyAdapter, GameSnapshot,
    GameState, LevelStatus, MoveError, MoveOutcome,
};
use crate::journal::{pos_pair, GameOverReason, Journal, JournalEvent, MoveOutcomeKind};
use crate::store::{PlayerProfile, ProfileStore};
use crate::types::{BoardLayout, GameAction, InputEvent, Overlay, Pos};

use crate::config::SessionConfig;
use crate::controls::action_for_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Waiting for the player to continue; `next` is the upcoming level's budget.
    LevelComplete { next: Budget },
    GameOver {
        reason: GameOverReason,
        new_highscore: bool,
    },
    Quit,
}

pub struct Session<S: ProfileStore> {
    game: GameState,
    adapter: DifficultyAdapter,
    profile: PlayerProfile,
    store: S,
    journal: Journal,
    phase: Phase,
    cursor: Pos,
    selected: Option<Pos>,
}

impl<S: ProfileStore> Session<S> {
    /// Start a session at level 1 with a generated board.
    pub fn new(config: &SessionConfig, store: S, journal: Journal) -> Result<Self, BoardError> {
        let game = GameState::new(config.seed, config.game)?;
        Ok(Self::with_game(game, &config.player_name, config.seed, store, journal))
    }

    /// Start a session around an existing game.
    pub fn with_game(
        game: GameState,
        player_name: &str,
        seed: u32,
        store: S,
        mut journal: Journal,
    ) -> Self {
        let ts = game.clock_ms();
        let profile = match store.try_load() {
            Ok(Some(profile)) => profile,
            Ok(None) => PlayerProfile::new(player_name),
            Err(e) => {
                journal.record(ts, &JournalEvent::ProfileLoadFailed { error: e.to_string() });
                PlayerProfile::new(player_name)
            }
        };

        let mut session = Self {
            game,
            adapter: DifficultyAdapter::new(),
            profile,
            store,
            journal,
            phase: Phase::Playing,
            cursor: Pos::default(),
            selected: None,
        };
        session.record(JournalEvent::SessionStarted {
            seed,
            player: session.profile.name.clone(),
            highscore: session.profile.highscore,
        });
        session.record_level_started();
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_quit(&self) -> bool {
        self.phase == Phase::Quit
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn adapter(&self) -> &DifficultyAdapter {
        &self.adapter
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    /// Apply one input event. Pointer events need the current board layout.
    pub fn handle_event(&mut self, event: InputEvent, layout: Option<&BoardLayout>) -> Result<(), CoreError> {
        match event {
            InputEvent::Quit => {
                self.phase = Phase::Quit;
                Ok(())
            }
            InputEvent::KeyDown(key) => match action_for_key(key) {
                Some(action) => self.apply(action),
                None => Ok(()),
            },
            InputEvent::PointerDown { x, y } => {
                if let Phase::LevelComplete { .. } = self.phase {
                    return self.apply(GameAction::Continue);
                }
                match layout.and_then(|l| l.cell_at(x, y)) {
                    Some(pos) => self.apply(GameAction::SelectAt(pos)),
                    None => Ok(()),
                }
            }
        }
    }

    pub fn apply(&mut self, action: GameAction) -> Result<(), CoreError> {
        if action == GameAction::Quit {
            self.phase = Phase::Quit;
            return Ok(());
        }

        match self.phase {
            Phase::Quit => {}
            Phase::Playing => match action {
                GameAction::MoveCursor(dir) => self.cursor = self.cursor.step(dir),
                GameAction::Select => self.select(self.cursor),
                GameAction::SelectAt(pos) => {
                    if pos.in_bounds() {
                        self.cursor = pos;
                    }
                    self.select(pos);
                }
                GameAction::Deselect => self.selected = None,
                GameAction::Continue | GameAction::Restart | GameAction::Quit => {}
            },
            Phase::LevelComplete { next } => {
                if matches!(
                    action,
                    GameAction::Continue | GameAction::Select | GameAction::SelectAt(_)
                ) {
                    self.start_next_level(next)?;
                }
            }
            Phase::GameOver { .. } => {
                if matches!(action, GameAction::Restart | GameAction::Select) {
                    self.restart_game()?;
                }
            }
        }
        Ok(())
    }

    /// Advance game time by one frame.
    ///
    /// A runaway cascade restarts the level instead of failing the session.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<(), CoreError> {
        if self.phase != Phase::Playing {
            return Ok(());
        }

        let was_animating = self.game.is_animating();
        match self.game.tick(elapsed_ms) {
            Ok(()) => {}
            Err(CascadeError::Runaway { rounds }) => {
                self.record(JournalEvent::CascadeRunaway {
                    level: self.game.level().level,
                    rounds,
                });
                self.selected = None;
                self.game.restart_level()?;
                self.record_level_started();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        if was_animating && self.game.is_settled() {
            let summary = self.game.cascade_summary();
            self.record(JournalEvent::CascadeSettled {
                level: self.game.level().level,
                rounds: summary.rounds,
                matches: summary.matches,
                points: summary.points,
            });
        }

        match self.game.level_status() {
            LevelStatus::InProgress => {}
            LevelStatus::Complete => self.complete_level(),
            LevelStatus::OutOfMoves => self.game_over(GameOverReason::OutOfMoves),
            LevelStatus::OutOfTime => self.game_over(GameOverReason::OutOfTime),
        }
        Ok(())
    }

    /// Fill `out` for rendering.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.game.snapshot_into(out);
        out.cursor = self.cursor;
        out.selected = self.selected;
        out.highscore = self.profile.highscore;
        out.overlay = match self.phase {
            Phase::LevelComplete { next } => Overlay::LevelComplete {
                level: self.game.level().level,
                next_move_limit: next.move_limit,
                next_time_limit_secs: next.time_limit_secs,
            },
            Phase::GameOver { new_highscore, .. } => Overlay::GameOver {
                total_score: self.game.total_score(),
                new_highscore,
            },
            Phase::Playing | Phase::Quit => Overlay::None,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn select(&mut self, pos: Pos) {
        if self.game.is_animating() {
            return;
        }

        let Some(first) = self.selected else {
            if self.game.board().get(pos).is_ok_and(|c| c.is_candy()) {
                self.selected = Some(pos);
            }
            return;
        };

        if first == pos {
            self.selected = None;
            return;
        }

        let outcome = match self.game.attempt_move(first, pos) {
            Ok(MoveOutcome::Matched { .. }) => MoveOutcomeKind::Matched,
            Ok(MoveOutcome::Reverted) => MoveOutcomeKind::Reverted,
            Err(MoveError::NotAdjacent { .. }) => MoveOutcomeKind::NotAdjacent,
            Err(MoveError::BlockedBySpecial { .. }) => MoveOutcomeKind::Blocked,
            Err(MoveError::Board(_)) => {
                self.selected = None;
                return;
            }
            Err(MoveError::Busy) | Err(MoveError::LevelOver) => return,
        };

        self.selected = None;
        self.record(JournalEvent::Move {
            level: self.game.level().level,
            from: pos_pair(first),
            to: pos_pair(pos),
            outcome,
            moves_remaining: self.game.level().moves_remaining,
        });
    }

    fn complete_level(&mut self) {
        let sample = self.game.level().sample();
        let total_score = self.game.total_score();
        self.record(JournalEvent::LevelCompleted {
            level: sample.level,
            score: sample.score,
            total_score,
            moves_used: sample.moves_used,
            time_used_secs: sample.time_used,
        });

        let trained = self.adapter.record(sample);
        let next = self.adapter.calculate_difficulty();
        if trained {
            self.record(JournalEvent::DifficultyTrained {
                samples: self.adapter.history().len(),
                move_limit: next.move_limit,
                time_limit_secs: next.time_limit_secs,
            });
        }

        self.selected = None;
        self.phase = Phase::LevelComplete { next };
    }

    fn game_over(&mut self, reason: GameOverReason) {
        let total_score = self.game.total_score();
        let new_highscore = self.profile.record_score(total_score);
        if new_highscore {
            match self.store.save(&self.profile) {
                Ok(()) => self.record(JournalEvent::ProfileSaved {
                    name: self.profile.name.clone(),
                    highscore: self.profile.highscore,
                }),
                Err(e) => self.record(JournalEvent::ProfileSaveFailed { error: e.to_string() }),
            }
        }

        self.record(JournalEvent::GameOver {
            level: self.game.level().level,
            total_score,
            reason,
            new_highscore,
        });
        self.selected = None;
        self.phase = Phase::GameOver {
            reason,
            new_highscore,
        };
    }

    fn start_next_level(&mut self, budget: Budget) -> Result<(), BoardError> {
        let level = self.game.level().level + 1;
        let total_score = self.game.total_score();
        self.game.start_level(level, total_score, budget)?;
        self.enter_playing();
        Ok(())
    }

    /// New game from level 1; the difficulty history carries over.
    fn restart_game(&mut self) -> Result<(), BoardError> {
        let budget = self.adapter.calculate_difficulty();
        self.game.start_level(1, 0, budget)?;
        self.enter_playing();
        Ok(())
    }

    fn enter_playing(&mut self) {
        self.phase = Phase::Playing;
        self.selected = None;
        self.record_level_started();
    }

    fn record_level_started(&mut self) {
        let level = self.game.level();
        let event = JournalEvent::LevelStarted {
            level: level.level,
            move_limit: level.move_limit,
            time_limit_secs: level.budget().time_limit_secs,
            obstacles: obstacles_for_level(level.level),
        };
        self.record(event);
    }

    fn record(&mut self, event: JournalEvent) {
        self.journal.record(self.game.clock_ms(), &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, GameConfig};
    use crate::store::MemoryStore;
    use crate::types::{Cell, Key, DEFAULT_MOVE_LIMIT};

    const QUIET: [&str; 8] = [
        "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG",
        "BYMCRGBY",
    ];

    /// Row 0 turns into "RRRYMCRG" when (2,0) and (3,0) swap.
    fn almost_rows() -> [&'static str; 8] {
        let mut rows = QUIET;
        rows[0] = "RRYRMCRG";
        rows
    }

    fn session_with(rows: [&'static str; 8], config: GameConfig, store: MemoryStore) -> Session<MemoryStore> {
        let game = GameState::from_board(Board::from_rows(&rows).unwrap(), 7, config);
        Session::with_game(game, "tester", 7, store, Journal::memory())
    }

    fn settle(session: &mut Session<MemoryStore>) {
        for _ in 0..10_000 {
            session.tick(16).unwrap();
            if !session.game().is_animating() {
                break;
            }
        }
    }

    fn events(session: &Session<MemoryStore>) -> Vec<String> {
        session
            .journal()
            .lines()
            .iter()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["event"].as_str().unwrap_or_default().to_string()
            })
            .collect()
    }

    #[test]
    fn test_selecting_same_cell_twice_deselects() {
        let mut s = session_with(QUIET, GameConfig::default(), MemoryStore::new());
        s.apply(GameAction::SelectAt(Pos::new(3, 3))).unwrap();
        assert_eq!(s.selected(), Some(Pos::new(3, 3)));
        s.apply(GameAction::SelectAt(Pos::new(3, 3))).unwrap();
        assert_eq!(s.selected(), None);
        assert_eq!(s.game().level().moves_remaining, DEFAULT_MOVE_LIMIT);
    }

    #[test]
    fn test_non_adjacent_selection_deselects_without_cost() {
        let mut s = session_with(QUIET, GameConfig::default(), MemoryStore::new());
        s.apply(GameAction::SelectAt(Pos::new(0, 0))).unwrap();
        s.apply(GameAction::SelectAt(Pos::new(4, 4))).unwrap();
        assert_eq!(s.selected(), None);
        assert_eq!(s.game().level().moves_remaining, DEFAULT_MOVE_LIMIT);
        assert!(events(&s).contains(&"move".to_string()));
    }

    #[test]
    fn test_obstacle_cannot_be_selected_or_swapped() {
        let mut rows = QUIET;
        rows[1] = "#YMCRGBY";
        let mut s = session_with(rows, GameConfig::default(), MemoryStore::new());

        s.apply(GameAction::SelectAt(Pos::new(0, 1))).unwrap();
        assert_eq!(s.selected(), None);

        s.apply(GameAction::SelectAt(Pos::new(0, 0))).unwrap();
        s.apply(GameAction::SelectAt(Pos::new(0, 1))).unwrap();
        assert_eq!(s.selected(), None);
        assert_eq!(s.game().level().moves_remaining, DEFAULT_MOVE_LIMIT);
        assert_eq!(s.game().board().get(Pos::new(0, 1)), Ok(Cell::Obstacle));
    }

    #[test]
    fn test_keyboard_cursor_swap() {
        let mut s = session_with(almost_rows(), GameConfig::default(), MemoryStore::new());
        for key in [Key::Right, Key::Right, Key::Space, Key::Right, Key::Enter] {
            s.handle_event(InputEvent::KeyDown(key), None).unwrap();
        }
        assert!(s.game().is_animating());
        assert_eq!(s.game().level().moves_remaining, DEFAULT_MOVE_LIMIT - 1);
        settle(&mut s);
        assert!(s.game().total_score() >= 50);
    }

    #[test]
    fn test_pointer_swap_uses_layout() {
        let layout = BoardLayout {
            origin_x: 2,
            origin_y: 1,
            cell_w: 4,
            cell_h: 2,
        };
        let mut s = session_with(almost_rows(), GameConfig::default(), MemoryStore::new());
        // Cell (2,0) spans x 10..14, y 1..3; cell (3,0) spans x 14..18.
        s.handle_event(InputEvent::PointerDown { x: 11, y: 2 }, Some(&layout))
            .unwrap();
        assert_eq!(s.selected(), Some(Pos::new(2, 0)));
        s.handle_event(InputEvent::PointerDown { x: 15, y: 1 }, Some(&layout))
            .unwrap();
        assert_eq!(s.selected(), None);
        assert!(s.game().is_animating());

        // Input is gated while the cascade runs.
        s.handle_event(InputEvent::PointerDown { x: 3, y: 14 }, Some(&layout))
            .unwrap();
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_level_complete_then_continue() {
        let config = GameConfig {
            target_score: 50,
            ..GameConfig::default()
        };
        let mut s = session_with(almost_rows(), config, MemoryStore::new());
        s.apply(GameAction::SelectAt(Pos::new(2, 0))).unwrap();
        s.apply(GameAction::SelectAt(Pos::new(3, 0))).unwrap();
        settle(&mut s);

        let Phase::LevelComplete { next } = s.phase() else {
            panic!("expected level complete, got {:?}", s.phase());
        };
        assert_eq!(next, Budget::default());
        assert_eq!(s.adapter().history().len(), 1);
        assert_eq!(s.adapter().history()[0].moves_used, 1);
        assert!(matches!(
            s.snapshot().overlay,
            Overlay::LevelComplete { level: 1, next_move_limit: 20, .. }
        ));

        let total = s.game().total_score();
        s.handle_event(InputEvent::KeyDown(Key::Char('c')), None).unwrap();
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.game().level().level, 2);
        assert_eq!(s.game().total_score(), total);
        assert_eq!(s.game().score(), 0);
        assert_eq!(s.game().board().count_obstacles(), 1);
        assert!(events(&s).contains(&"level_completed".to_string()));
    }

    #[test]
    fn test_game_over_saves_highscore_and_restarts() {
        let config = GameConfig {
            default_budget: Budget {
                move_limit: 1,
                time_limit_secs: 60,
            },
            ..GameConfig::default()
        };
        let mut s = session_with(almost_rows(), config, MemoryStore::new());
        s.apply(GameAction::SelectAt(Pos::new(2, 0))).unwrap();
        s.apply(GameAction::SelectAt(Pos::new(3, 0))).unwrap();
        settle(&mut s);

        assert_eq!(
            s.phase(),
            Phase::GameOver {
                reason: GameOverReason::OutOfMoves,
                new_highscore: true
            }
        );
        let total = s.game().total_score();
        assert_eq!(s.profile().highscore, total);
        assert_eq!(s.store().saves(), 1);
        assert_eq!(s.store().load().map(|p| p.highscore), Some(total));

        s.handle_event(InputEvent::KeyDown(Key::Char('r')), None).unwrap();
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.game().level().level, 1);
        assert_eq!(s.game().total_score(), 0);
    }

    #[test]
    fn test_lower_score_keeps_stored_highscore() {
        let store = MemoryStore::with_profile(PlayerProfile {
            name: "tester".into(),
            highscore: 90_000,
        });
        let mut s = session_with(QUIET, GameConfig::default(), store);
        s.tick(60_000).unwrap();

        assert_eq!(
            s.phase(),
            Phase::GameOver {
                reason: GameOverReason::OutOfTime,
                new_highscore: false
            }
        );
        assert_eq!(s.store().saves(), 0);
        assert_eq!(s.snapshot().highscore, 90_000);
    }

    #[test]
    fn test_runaway_restarts_level() {
        let config = GameConfig {
            cascade_round_cap: 0,
            ..GameConfig::default()
        };
        let mut s = session_with(almost_rows(), config, MemoryStore::new());
        s.apply(GameAction::SelectAt(Pos::new(2, 0))).unwrap();
        s.apply(GameAction::SelectAt(Pos::new(3, 0))).unwrap();
        s.tick(16).unwrap();

        assert_eq!(s.phase(), Phase::Playing);
        assert!(!s.game().is_animating());
        assert_eq!(s.game().level().moves_remaining, DEFAULT_MOVE_LIMIT);
        assert!(events(&s).contains(&"cascade_runaway".to_string()));
    }

    #[test]
    fn test_quit_from_any_phase() {
        let mut s = session_with(QUIET, GameConfig::default(), MemoryStore::new());
        s.handle_event(InputEvent::Quit, None).unwrap();
        assert!(s.is_quit());

        let mut s = session_with(QUIET, GameConfig::default(), MemoryStore::new());
        s.tick(60_000).unwrap();
        s.handle_event(InputEvent::KeyDown(Key::Char('q')), None).unwrap();
        assert!(s.is_quit());
    }
}
