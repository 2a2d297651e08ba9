//! Bot strategy trait and implementations.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::engine::evaluator::{evaluate, EvalWeights};
use crate::engine::models::Move;
use crate::game::round::Round;

/// A bot strategy selects the next move for a round in progress.
/// Returns `None` when the round has no legal move.
pub trait BotStrategy: Send + Sync {
    fn choose_move(&self, round: &Round, rng: &mut StdRng) -> Option<Move>;
}

/// Picks a uniformly random legal move.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn choose_move(&self, round: &Round, rng: &mut StdRng) -> Option<Move> {
        round.legal_moves().choose(rng).copied()
    }
}

/// One-ply lookahead: tries every legal move on a copy of the round and keeps the
/// best-evaluated one. Ties are broken at random.
pub struct GreedyStrategy {
    pub weights: EvalWeights,
}

impl GreedyStrategy {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }
}

impl Default for GreedyStrategy {
    fn default() -> Self {
        Self::new(EvalWeights::default())
    }
}

impl BotStrategy for GreedyStrategy {
    fn choose_move(&self, round: &Round, rng: &mut StdRng) -> Option<Move> {
        let mut best: Vec<Move> = Vec::new();
        let mut best_value = f64::NEG_INFINITY;

        for mv in round.legal_moves() {
            let mut trial = round.clone();
            let report = match trial.apply_move(&mv) {
                Ok(report) => report,
                Err(err) => {
                    tracing::warn!(?mv, %err, "legal move rejected during lookahead");
                    continue;
                }
            };
            let value = evaluate(&trial, &report, &self.weights);
            if value > best_value {
                best_value = value;
                best.clear();
                best.push(mv);
            } else if value == best_value {
                best.push(mv);
            }
        }

        best.choose(rng).copied()
    }
}

/// Build a strategy from a profile's `strategy_type`.
pub fn strategy_from_type(
    strategy_type: &str,
    weights: EvalWeights,
) -> Option<Box<dyn BotStrategy>> {
    match strategy_type {
        "random" => Some(Box::new(RandomStrategy)),
        "greedy" => Some(Box::new(GreedyStrategy::new(weights))),
        _ => None,
    }
}
