//! Heuristic evaluation of a position reached by a candidate move.
//! Higher is better; used by the greedy bot to rank moves.

use serde::{Deserialize, Serialize};

use crate::engine::models::{PlacementReport, RoundPhase};
use crate::game::round::Round;
use crate::game::types::GRID_SIZE;

/// Tunable parameters for the move evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalWeights {
    pub score_weight: f64,
    pub capture_weight: f64,
    pub empty_cell_weight: f64,
    pub mobility_weight: f64,
    pub mobility_cap: usize,
    pub win_bonus: f64,
    pub loss_penalty: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

pub const DEFAULT_WEIGHTS: EvalWeights = EvalWeights {
    score_weight: 0.01,
    capture_weight: 4.0,
    empty_cell_weight: 0.15,
    mobility_weight: 0.05,
    mobility_cap: 40,
    win_bonus: 1000.0,
    loss_penalty: 500.0,
};

pub const CAPTURE_HEAVY_WEIGHTS: EvalWeights = EvalWeights {
    score_weight: 0.005,
    capture_weight: 8.0,
    empty_cell_weight: 0.10,
    mobility_weight: 0.03,
    mobility_cap: 40,
    win_bonus: 1000.0,
    loss_penalty: 500.0,
};

pub const SURVIVAL_WEIGHTS: EvalWeights = EvalWeights {
    score_weight: 0.005,
    capture_weight: 2.0,
    empty_cell_weight: 0.30,
    mobility_weight: 0.15,
    mobility_cap: 60,
    win_bonus: 1000.0,
    loss_penalty: 800.0,
};

/// Resolve a named preset.
pub fn weights_for_profile(name: &str) -> Option<EvalWeights> {
    match name {
        "default" => Some(DEFAULT_WEIGHTS),
        "capture_heavy" => Some(CAPTURE_HEAVY_WEIGHTS),
        "survival" => Some(SURVIVAL_WEIGHTS),
        _ => None,
    }
}

pub fn evaluate(after: &Round, report: &PlacementReport, weights: &EvalWeights) -> f64 {
    match report.phase {
        RoundPhase::Won => return weights.win_bonus + report.points as f64 * weights.score_weight,
        RoundPhase::Lost(_) => return -weights.loss_penalty,
        RoundPhase::AwaitingPlacement => {}
    }

    let empty = (GRID_SIZE * GRID_SIZE - after.grid().filled_count()) as f64;
    let mobility = after.legal_moves().len().min(weights.mobility_cap) as f64;

    report.points as f64 * weights.score_weight
        + report.letters_captured as f64 * weights.capture_weight
        + empty * weights.empty_cell_weight
        + mobility * weights.mobility_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_presets() {
        assert_eq!(weights_for_profile("default"), Some(DEFAULT_WEIGHTS));
        assert_eq!(weights_for_profile("survival"), Some(SURVIVAL_WEIGHTS));
        assert!(weights_for_profile("reckless").is_none());
    }

    #[test]
    fn test_weights_deserialize_from_toml() {
        let w: EvalWeights = toml::from_str(
            r#"
            score_weight = 0.02
            capture_weight = 5.0
            empty_cell_weight = 0.2
            mobility_weight = 0.1
            mobility_cap = 30
            win_bonus = 900.0
            loss_penalty = 400.0
            "#,
        )
        .unwrap();
        assert_eq!(w.mobility_cap, 30);
        assert_eq!(w.capture_weight, 5.0);
    }
}
