//! Synchronous round simulator: drives a round to its end with a bot strategy.
//! Used by the arena and the bot diagnostics.

use rand::rngs::StdRng;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::RoundSummary;
use crate::game::round::Round;

/// Upper bound on placements per simulated round. The move budget ends every round well
/// before this; it only guards against a strategy that keeps failing.
pub const MAX_PLACEMENTS: usize = 500;

/// Play `round` until it is over. Returns `None` if the strategy gave up or the
/// placement cap was hit first.
pub fn play_round(
    round: &mut Round,
    strategy: &dyn BotStrategy,
    rng: &mut StdRng,
) -> Option<RoundSummary> {
    for _ in 0..MAX_PLACEMENTS {
        if round.is_over() {
            break;
        }
        let mv = strategy.choose_move(round, rng)?;
        if let Err(err) = round.apply_move(&mv) {
            tracing::warn!(?mv, %err, "strategy chose a rejected move");
            return None;
        }
    }
    round.summary()
}
