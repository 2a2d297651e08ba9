//! Arena CLI: run bot experiments on seeded Verbra rounds from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --rounds 200 --level 5 --strategy greedy
//!   cargo run --release --bin arena -- --rounds 100 --profile cautious --config verbra.toml

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use verbra_engine::engine::arena::{run_arena, ArenaConfig, ArenaResult};
use verbra_engine::engine::bot_strategy::{strategy_from_type, BotStrategy};
use verbra_engine::engine::config::{load_config, load_default_config, ConfigFile};
use verbra_engine::engine::evaluator::{weights_for_profile, EvalWeights};

#[derive(Parser)]
#[command(name = "arena", about = "Run bot simulations over seeded Verbra rounds")]
struct Cli {
    /// Number of rounds to play
    #[arg(long, default_value = "100")]
    rounds: usize,

    /// Base random seed; round i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Level to play every round at
    #[arg(long, default_value = "1")]
    level: u32,

    /// Strategy type: "greedy" or "random"
    #[arg(long, default_value = "greedy")]
    strategy: String,

    /// Eval preset for the greedy bot: "default", "capture_heavy", "survival"
    #[arg(long)]
    eval: Option<String>,

    /// Profile name from verbra.toml (overrides --strategy and --eval)
    #[arg(long)]
    profile: Option<String>,

    /// Path to verbra.toml (default: auto-discover)
    #[arg(long, env = "VERBRA_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

struct BotConfig {
    name: String,
    strategy_type: String,
    weights: EvalWeights,
}

fn resolve_bot(cli: &Cli, config: &ConfigFile) -> Result<BotConfig, String> {
    if let Some(name) = &cli.profile {
        let profile = config.profiles.get(name).ok_or_else(|| {
            format!(
                "profile '{}' not found; available: {:?}",
                name,
                config.profiles.keys().collect::<Vec<_>>()
            )
        })?;
        return Ok(BotConfig {
            name: name.clone(),
            strategy_type: profile.strategy_type.clone(),
            weights: profile.weights(),
        });
    }

    let eval = cli.eval.as_deref().unwrap_or("default");
    let weights = weights_for_profile(eval).ok_or_else(|| format!("unknown eval preset '{eval}'"))?;
    Ok(BotConfig {
        name: cli.strategy.clone(),
        strategy_type: cli.strategy.clone(),
        weights,
    })
}

fn result_json(bot: &BotConfig, cli: &Cli, result: &ArenaResult) -> serde_json::Value {
    let (ci_lo, ci_hi) = result.confidence_interval_95();
    serde_json::json!({
        "bot": bot.name,
        "strategy_type": bot.strategy_type,
        "level": cli.level,
        "seed": cli.seed,
        "rounds": result.num_rounds,
        "wins": result.wins,
        "win_rate": result.win_rate(),
        "win_rate_ci95": [ci_lo, ci_hi],
        "losses": result.losses,
        "unfinished": result.unfinished,
        "avg_score": result.avg_score(),
        "score_stddev": result.score_stddev(),
        "avg_capture_ratio": result.avg_capture_ratio(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };
    let dictionary = config.load_dictionary()?;
    let bot = resolve_bot(&cli, &config)?;
    let strategy: Box<dyn BotStrategy> = strategy_from_type(&bot.strategy_type, bot.weights)
        .ok_or_else(|| format!("unknown strategy type '{}'", bot.strategy_type))?;

    eprintln!(
        "Arena: {} rounds, level={}, seed={}, bot={} ({}), words={}",
        cli.rounds,
        cli.level,
        cli.seed,
        bot.name,
        bot.strategy_type,
        dictionary.len()
    );

    let total = cli.rounds;
    let progress_cb = move |done: usize, _total: usize| {
        eprint!("\r  [{}/{}] rounds completed", done, total);
    };

    let arena_config = ArenaConfig {
        rounds: cli.rounds,
        base_seed: cli.seed,
        level: cli.level,
    };
    let result = run_arena(
        strategy.as_ref(),
        &arena_config,
        &dictionary,
        &config.rules,
        Some(&progress_cb),
    )?;

    eprintln!("\r                                    "); // clear progress line
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result_json(&bot, &cli, &result))?);
    } else {
        println!("{}", result.summary());
    }
    Ok(())
}
