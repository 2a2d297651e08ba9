//! Bot arena runner: many seeded rounds with one strategy, played in parallel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::config::RulesConfig;
use crate::engine::error::GameError;
use crate::engine::models::{LossReason, RoundSummary};
use crate::engine::simulator::play_round;
use crate::game::round::Round;

/// What to run.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub rounds: usize,
    pub base_seed: u64,
    pub level: u32,
}

/// Aggregated results from an arena run.
#[derive(Debug, Clone, Default)]
pub struct ArenaResult {
    pub num_rounds: usize,
    pub wins: usize,
    pub losses: HashMap<LossReason, usize>,
    /// Rounds the strategy abandoned before a terminal state.
    pub unfinished: usize,
    pub scores: Vec<f64>,
    pub capture_ratios: Vec<f64>,
    pub round_durations_ms: Vec<f64>,
}

impl ArenaResult {
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.num_rounds.max(1) as f64
    }

    pub fn avg_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    pub fn score_stddev(&self) -> f64 {
        if self.scores.len() < 2 {
            return 0.0;
        }
        let avg = self.avg_score();
        let sum_sq = self.scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>();
        let variance = sum_sq / (self.scores.len() - 1) as f64;
        variance.sqrt()
    }

    pub fn avg_capture_ratio(&self) -> f64 {
        if self.capture_ratios.is_empty() {
            return 0.0;
        }
        self.capture_ratios.iter().sum::<f64>() / self.capture_ratios.len() as f64
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self) -> (f64, f64) {
        let n = self.num_rounds;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate();
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn losses_by(&self, reason: LossReason) -> usize {
        self.losses.get(&reason).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} rounds)", self.num_rounds)];
        lines.push("=".repeat(60));
        let (ci_lo, ci_hi) = self.confidence_interval_95();
        lines.push(format!(
            "  {:>12}: {:3} ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
            "Wins",
            self.wins,
            self.win_rate() * 100.0,
            ci_lo * 100.0,
            ci_hi * 100.0,
        ));
        lines.push(format!("  {:>12}: {}", "Out of moves", self.losses_by(LossReason::OutOfMoves)));
        lines.push(format!("  {:>12}: {}", "No space", self.losses_by(LossReason::NoSpace)));
        if self.unfinished > 0 {
            lines.push(format!("  {:>12}: {}", "Unfinished", self.unfinished));
        }
        lines.push(format!(
            "  {:>12}: avg={:6.1} +/- {:5.1}  letters found={:4.1}%",
            "Score",
            self.avg_score(),
            self.score_stddev(),
            self.avg_capture_ratio() * 100.0,
        ));
        if !self.round_durations_ms.is_empty() {
            let total_ms = self.round_durations_ms.iter().sum::<f64>();
            let avg_ms = total_ms / self.round_durations_ms.len() as f64;
            lines.push(format!(
                "  Avg round: {:.1}ms  |  CPU total: {:.1}s",
                avg_ms,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }

    fn record(&mut self, outcome: Option<RoundSummary>, elapsed_ms: f64) {
        self.round_durations_ms.push(elapsed_ms);
        let Some(summary) = outcome else {
            self.unfinished += 1;
            return;
        };
        match summary.loss_reason {
            None => self.wins += 1,
            Some(reason) => *self.losses.entry(reason).or_default() += 1,
        }
        self.scores.push(summary.score as f64);
        self.capture_ratios
            .push(summary.letters_found as f64 / summary.word_len.max(1) as f64);
    }
}

/// Play `config.rounds` rounds with seeds `base_seed..base_seed + rounds`.
/// Each round owns its generator, so results do not depend on thread scheduling.
pub fn run_arena(
    strategy: &dyn BotStrategy,
    config: &ArenaConfig,
    dictionary: &[String],
    rules: &RulesConfig,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> Result<ArenaResult, GameError> {
    let done = AtomicUsize::new(0);

    let outcomes: Vec<(Option<RoundSummary>, f64)> = (0..config.rounds)
        .into_par_iter()
        .map(|i| -> Result<(Option<RoundSummary>, f64), GameError> {
            let seed = config.base_seed.wrapping_add(i as u64);
            let t0 = Instant::now();
            let mut round =
                Round::with_rng(config.level, dictionary, rules, StdRng::seed_from_u64(seed))?;
            let mut bot_rng = StdRng::seed_from_u64(seed ^ 0x5eed_b07);
            let outcome = play_round(&mut round, strategy, &mut bot_rng);
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(finished, config.rounds);
            }
            Ok((outcome, elapsed_ms))
        })
        .collect::<Result<_, _>>()?;

    let mut result = ArenaResult {
        num_rounds: config.rounds,
        ..ArenaResult::default()
    };
    for (outcome, elapsed_ms) in outcomes {
        result.record(outcome, elapsed_ms);
    }
    tracing::info!(
        rounds = result.num_rounds,
        wins = result.wins,
        avg_score = result.avg_score(),
        "arena finished"
    );
    Ok(result)
}
