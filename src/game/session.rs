//! Cross-round progression: level, cumulative score and the persisted counters.
//!
//! A session starts one level past the persisted `last_level`. Winning a round banks its
//! score and allows `advance_level`; losing ends the run, and `restart` replays the same
//! level with the cumulative score reset. Counters are written once per finished round.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::config::RulesConfig;
use crate::engine::error::{GameError, SessionError};
use crate::engine::models::{Move, PlacementReport, RoundPhase};
use crate::engine::progress::{ProgressStore, HIGH_SCORE_KEY, LAST_LEVEL_KEY};
use crate::game::round::Round;

pub struct Session<S: ProgressStore> {
    store: S,
    dictionary: Vec<String>,
    rules: RulesConfig,
    seeder: StdRng,
    level: u32,
    /// Scores of won rounds in the current run.
    banked_score: u64,
    high_score: u64,
    round: Round,
    recorded: bool,
}

impl<S: ProgressStore> Session<S> {
    /// Open a session, reading `last_level` and `high_score` from `store`.
    pub fn new(
        store: S,
        dictionary: Vec<String>,
        rules: RulesConfig,
        seed: Option<u64>,
    ) -> Result<Self, SessionError> {
        let last_level = store.load(LAST_LEVEL_KEY)?.unwrap_or(0);
        let high_score = store.load(HIGH_SCORE_KEY)?.unwrap_or(0);
        let level = u32::try_from(last_level.saturating_add(1)).unwrap_or(u32::MAX);

        let mut seeder = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let round = Round::with_rng(
            level,
            &dictionary,
            &rules,
            StdRng::seed_from_u64(seeder.gen()),
        )?;

        tracing::info!(level, high_score, "session opened");
        Ok(Self {
            store,
            dictionary,
            rules,
            seeder,
            level,
            banked_score: 0,
            high_score,
            round,
            recorded: false,
        })
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Banked scores of this run plus the current round's score.
    pub fn cumulative_score(&self) -> u64 {
        self.banked_score + self.round.score()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rotate_slot(&mut self, slot: usize) -> Result<(), SessionError> {
        Ok(self.round.rotate_slot(slot)?)
    }

    pub fn attempt_placement(
        &mut self,
        slot: usize,
        row: i32,
        col: i32,
    ) -> Result<PlacementReport, SessionError> {
        let report = self.round.attempt_placement(slot, row, col)?;
        self.record_if_over()?;
        Ok(report)
    }

    pub fn apply_move(&mut self, mv: &Move) -> Result<PlacementReport, SessionError> {
        let report = self.round.apply_move(mv)?;
        self.record_if_over()?;
        Ok(report)
    }

    /// Start the next level. Only valid after a won round.
    pub fn advance_level(&mut self) -> Result<(), SessionError> {
        if self.round.phase() != RoundPhase::Won {
            return Err(GameError::RoundNotWon.into());
        }
        self.banked_score += self.round.score();
        self.level = self.level.saturating_add(1);
        self.start_round()
    }

    /// Replay the current level from scratch. A restart after a loss also resets the
    /// cumulative score; a restart mid-round keeps the banked score.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if matches!(self.round.phase(), RoundPhase::Lost(_)) {
            self.banked_score = 0;
        }
        self.start_round()
    }

    fn start_round(&mut self) -> Result<(), SessionError> {
        let rng = StdRng::seed_from_u64(self.seeder.gen());
        self.round = Round::with_rng(self.level, &self.dictionary, &self.rules, rng)?;
        self.recorded = false;
        Ok(())
    }

    fn record_if_over(&mut self) -> Result<(), SessionError> {
        if self.recorded || !self.round.is_over() {
            return Ok(());
        }
        self.recorded = true;

        if self.round.phase() == RoundPhase::Won {
            self.store.store(LAST_LEVEL_KEY, u64::from(self.level))?;
        }
        let total = self.cumulative_score();
        if total > self.high_score {
            self.high_score = total;
            self.store.store(HIGH_SCORE_KEY, total)?;
            tracing::info!(high_score = total, "new high score");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::models::LossReason;
    use crate::engine::progress::{FileProgressStore, MemoryProgressStore};
    use crate::game::types::{Grid, Piece, PieceCell, ShapeKind, Tray};

    fn session(store: MemoryProgressStore) -> Session<MemoryProgressStore> {
        Session::new(
            store,
            vec!["AB".to_string()],
            RulesConfig::default(),
            Some(11),
        )
        .unwrap()
    }

    fn piece(id: u64, shape: ShapeKind, cells: &[(usize, usize)], letters: &str) -> Piece {
        Piece {
            id,
            shape,
            cells: cells
                .iter()
                .zip(letters.chars())
                .map(|(&(row, col), letter)| PieceCell { row, col, letter })
                .collect(),
            width: cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0),
            height: cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0),
        }
    }

    /// Put the round one placement away from a win: row 5 needs "AB" in its last two cells.
    fn set_up_win(session: &mut Session<MemoryProgressStore>) {
        session.round.set_grid(Grid::from_rows(&["", "", "", "", "", "XXXX.."]));
        let mut tray = Tray::default();
        tray.set(0, Some(piece(900, ShapeKind::I2, &[(0, 0), (0, 1)], "AB")));
        session.round.set_tray(tray);
    }

    /// Leave no room for the remaining tray pieces once the dot fills (0, 1).
    fn set_up_loss(session: &mut Session<MemoryProgressStore>) {
        session.round.set_grid(Grid::from_rows(&[
            "..XXXX", "X.XXXX", "XX.XXX", "XXX.XX", "XXXX.X", "XXXXX.",
        ]));
        let mut tray = Tray::default();
        tray.set(0, Some(piece(901, ShapeKind::Dot, &[(0, 0)], "Q")));
        tray.set(1, Some(piece(902, ShapeKind::I2, &[(0, 0), (0, 1)], "QQ")));
        session.round.set_tray(tray);
    }

    #[test]
    fn test_new_session_starts_after_last_level() {
        let mut store = MemoryProgressStore::new();
        store.store(LAST_LEVEL_KEY, 4).unwrap();
        store.store(HIGH_SCORE_KEY, 1200).unwrap();
        let s = session(store);
        assert_eq!(s.level(), 5);
        assert_eq!(s.round().level(), 5);
        assert_eq!(s.high_score(), 1200);
        assert_eq!(s.cumulative_score(), 0);
    }

    #[test]
    fn test_fresh_store_starts_at_level_one() {
        let s = session(MemoryProgressStore::new());
        assert_eq!(s.level(), 1);
        assert_eq!(s.high_score(), 0);
    }

    #[test]
    fn test_win_writes_counters_and_advances() {
        let mut s = session(MemoryProgressStore::new());
        set_up_win(&mut s);

        let report = s.attempt_placement(0, 5, 5).unwrap();
        assert_eq!(report.phase, RoundPhase::Won);
        assert_eq!(s.store().load(LAST_LEVEL_KEY).unwrap(), Some(1));
        assert_eq!(s.store().load(HIGH_SCORE_KEY).unwrap(), Some(200));
        assert_eq!(s.high_score(), 200);

        s.advance_level().unwrap();
        assert_eq!(s.level(), 2);
        assert_eq!(s.round().level(), 2);
        assert_eq!(s.cumulative_score(), 200);
        assert!(!s.round().is_over());
    }

    #[test]
    fn test_advance_requires_win() {
        let mut s = session(MemoryProgressStore::new());
        assert!(matches!(
            s.advance_level(),
            Err(SessionError::Game(GameError::RoundNotWon))
        ));
    }

    #[test]
    fn test_restart_after_loss_resets_cumulative_and_keeps_level() {
        let mut s = session(MemoryProgressStore::new());
        set_up_win(&mut s);
        s.attempt_placement(0, 5, 5).unwrap();
        s.advance_level().unwrap();

        assert_eq!(s.cumulative_score(), 200);

        set_up_loss(&mut s);
        let report = s.attempt_placement(0, 0, 1).unwrap();
        assert_eq!(report.phase, RoundPhase::Lost(LossReason::NoSpace));
        assert_eq!(s.store().load(LAST_LEVEL_KEY).unwrap(), Some(1));

        s.restart().unwrap();
        assert_eq!(s.level(), 2);
        assert_eq!(s.round().level(), 2);
        assert_eq!(s.cumulative_score(), 0);
        assert_eq!(s.high_score(), 200);
        assert!(!s.round().is_over());
    }

    #[test]
    fn test_restart_mid_round_keeps_banked_score() {
        let mut s = session(MemoryProgressStore::new());
        set_up_win(&mut s);
        s.attempt_placement(0, 5, 5).unwrap();
        s.advance_level().unwrap();

        s.restart().unwrap();
        assert_eq!(s.level(), 2);
        assert_eq!(s.cumulative_score(), 200);
    }

    #[test]
    fn test_placement_errors_pass_through() {
        let mut s = session(MemoryProgressStore::new());
        assert!(matches!(
            s.attempt_placement(7, 0, 0),
            Err(SessionError::Game(GameError::SlotOutOfRange { slot: 7 }))
        ));
    }

    #[test]
    fn test_corrupt_counter_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LAST_LEVEL_KEY), "lots").unwrap();
        let store = FileProgressStore::new(dir.path());
        let err = Session::new(store, vec!["AB".to_string()], RulesConfig::default(), None);
        assert!(matches!(err, Err(SessionError::Progress(_))));
    }
}
