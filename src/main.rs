use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use verbra_engine::engine::config::{load_config, load_default_config};
use verbra_engine::engine::error::SessionError;
use verbra_engine::engine::models::{Event, PlacementReport, RoundPhase};
use verbra_engine::engine::progress::FileProgressStore;
use verbra_engine::game::round::Round;
use verbra_engine::game::session::Session;
use verbra_engine::game::types::{Piece, SlotDisplay, GRID_SIZE};

#[derive(Parser)]
#[command(name = "verbra", about = "Play Verbra in the terminal")]
struct Cli {
    /// Path to verbra.toml (default: auto-discover)
    #[arg(long, env = "VERBRA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the persisted level and high-score counters
    #[arg(long, default_value = ".verbra", env = "VERBRA_DATA_DIR")]
    data_dir: PathBuf,

    /// Seed for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Print each move's events as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Place { slot: usize, row: i32, col: i32 },
    Rotate { slot: usize },
    Next,
    Restart,
    Show,
    Help,
    Quit,
}

fn arg<T: FromStr>(parts: &[&str], i: usize) -> Result<T, String> {
    let raw = parts.get(i).ok_or_else(|| format!("missing argument {i}"))?;
    raw.parse().map_err(|_| format!("'{raw}' is not a valid number here"))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.first().copied() {
        Some("place" | "p") => Ok(Command::Place {
            slot: arg(&parts, 1)?,
            row: arg(&parts, 2)?,
            col: arg(&parts, 3)?,
        }),
        Some("rotate" | "r") => Ok(Command::Rotate {
            slot: arg(&parts, 1)?,
        }),
        Some("next" | "n") => Ok(Command::Next),
        Some("restart") => Ok(Command::Restart),
        Some("show" | "s") => Ok(Command::Show),
        Some("help" | "h" | "?") => Ok(Command::Help),
        Some("quit" | "q" | "exit") => Ok(Command::Quit),
        Some(other) => Err(format!("unknown command '{other}', try 'help'")),
        None => Ok(Command::Show),
    }
}

const HELP: &str = "\
commands:
  place <slot> <row> <col>   place the tray piece centered on the cell (slots 0-2, rows/cols 0-5)
  rotate <slot>              rotate a tray piece clockwise
  next                       start the next level after a win
  restart                    replay the current level
  show                       redraw the board
  quit";

fn render_piece(piece: &Piece) -> Vec<String> {
    let mut rows = vec![vec!['.'; piece.width]; piece.height];
    for cell in &piece.cells {
        rows[cell.row][cell.col] = cell.letter;
    }
    rows.into_iter().map(|r| r.into_iter().collect()).collect()
}

fn render(session: &Session<FileProgressStore>) -> String {
    let round: &Round = session.round();
    let mut out = String::new();

    let word: Vec<String> = round
        .word_display()
        .iter()
        .map(|slot| match slot {
            SlotDisplay::Captured(c) => format!("[{c}]"),
            SlotDisplay::Revealed(c) => format!(" {} ", c.to_ascii_lowercase()),
            SlotDisplay::Hidden => " _ ".to_string(),
        })
        .collect();
    out.push_str(&format!(
        "level {}  score {} (total {}, best {})  moves {}/{}  streak {}\n",
        round.level(),
        round.score(),
        session.cumulative_score(),
        session.high_score(),
        round.moves_remaining(),
        round.move_budget(),
        round.streak(),
    ));
    out.push_str(&format!("word: {}\n\n", word.concat()));

    out.push_str("   ");
    for col in 0..GRID_SIZE {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');
    for (r, row) in round.grid().rows().iter().enumerate() {
        out.push_str(&format!("{r}  "));
        for cell in row {
            let ch = cell.letter().unwrap_or('.');
            let ch = if round.is_needed(ch) { ch } else { ch.to_ascii_lowercase() };
            out.push(ch);
            out.push(' ');
        }
        out.push('\n');
    }

    out.push_str("\ntray:\n");
    for (slot, piece) in round.tray().slots().iter().enumerate() {
        match piece {
            Some(piece) => {
                for (i, line) in render_piece(piece).iter().enumerate() {
                    let label = if i == 0 { format!("{slot}:") } else { "  ".to_string() };
                    out.push_str(&format!("  {label} {line}\n"));
                }
            }
            None => out.push_str(&format!("  {slot}: (used)\n")),
        }
    }
    out
}

fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::PiecePlaced { slot, moves_remaining, .. } => {
            format!("placed slot {slot}, {moves_remaining} moves left")
        }
        Event::LinesCleared { rows, cols, chain_depth, .. } if *chain_depth > 0 => {
            format!("chain x{chain_depth}: cleared rows {rows:?} cols {cols:?}")
        }
        Event::LinesCleared { rows, cols, .. } => format!("cleared rows {rows:?} cols {cols:?}"),
        Event::LettersRevealed { positions } => format!("revealed positions {positions:?}"),
        Event::LettersCaptured { captures } => {
            let letters: String = captures.iter().map(|c| c.letter).collect();
            format!("captured {letters}")
        }
        Event::ScoreAwarded { breakdown, streak, .. } => {
            format!("+{} points (streak {streak})", breakdown.total)
        }
        Event::TrayRefilled { .. } => "new pieces".to_string(),
        Event::Won { score } => format!("word complete! round score {score}"),
        Event::Lost { reason } => format!("round lost: {reason:?}"),
        _ => return None,
    };
    Some(text)
}

fn print_report(report: &PlacementReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in &report.events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else if let Some(text) = describe(event) {
            println!("  {text}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };
    let dictionary = config.load_dictionary()?;

    std::fs::create_dir_all(&cli.data_dir)?;
    let store = FileProgressStore::new(&cli.data_dir);
    let mut session = Session::new(store, dictionary, config.rules.clone(), cli.seed)?;

    println!("{HELP}\n");
    println!("{}", render(&session));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        let outcome: Result<(), SessionError> = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Show => Ok(()),
            Command::Rotate { slot } => session.rotate_slot(slot),
            Command::Place { slot, row, col } => match session.attempt_placement(slot, row, col) {
                Ok(report) => {
                    print_report(&report, cli.json)?;
                    Ok(())
                }
                Err(err) => Err(err),
            },
            Command::Next => session.advance_level(),
            Command::Restart => session.restart(),
        };

        match outcome {
            Ok(()) => {
                println!("{}", render(&session));
                match session.round().phase() {
                    RoundPhase::Won => println!("type 'next' for the next level"),
                    RoundPhase::Lost(_) => {
                        if let Some(summary) = session.round().summary() {
                            println!(
                                "the word was {}: {}/{} letters, {} lines, {} moves",
                                summary.word,
                                summary.letters_found,
                                summary.word_len,
                                summary.lines_cleared,
                                summary.moves_used
                            );
                        }
                        println!("type 'restart' to try again");
                    }
                    RoundPhase::AwaitingPlacement => {}
                }
            }
            Err(SessionError::Game(err)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        assert_eq!(
            parse_command("place 1 -2 5"),
            Ok(Command::Place { slot: 1, row: -2, col: 5 })
        );
        assert_eq!(parse_command("r 2"), Ok(Command::Rotate { slot: 2 }));
        assert_eq!(parse_command("  "), Ok(Command::Show));
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        assert!(parse_command("place 0 4294967296 0").is_err());
        assert!(parse_command("place 0 0 -2147483649").is_err());
        assert!(parse_command("place -1 0 0").is_err());
        assert!(parse_command("rotate -1").is_err());
        assert!(parse_command("place 0 1").is_err());
    }

    #[test]
    fn test_extreme_i32_reaches_session_as_is() {
        assert_eq!(
            parse_command("place 0 -2147483648 0"),
            Ok(Command::Place { slot: 0, row: i32::MIN, col: 0 })
        );
    }
}
