//! Mystery-word dictionary: a built-in list plus loading from a word-list file.

use std::path::Path;

use crate::engine::error::ConfigError;

pub const BUILTIN_WORDS: &[&str] = &[
    // 5 letters
    "APPLE", "BEACH", "BRAIN", "BREAD", "CHAIR", "CHARM", "CLOUD", "CRANE", "DANCE", "DREAM",
    "EARTH", "FLAME", "FROST", "GHOST", "GRAPE", "HEART", "HONEY", "HOUSE", "LEMON", "LIGHT",
    "MAGIC", "MONEY", "MUSIC", "NIGHT", "OCEAN", "PAINT", "PIANO", "PLANT", "QUEEN", "RIVER",
    "ROBOT", "SHINE", "SLEEP", "SMILE", "SNAKE", "SPACE", "STONE", "STORM", "SUGAR", "TIGER",
    "TOAST", "TRAIN", "WATER", "WHALE", "WORLD",
    // 6 letters
    "ANCHOR", "BASKET", "BOTTLE", "BRIDGE", "CAMERA", "CANDLE", "CASTLE", "CIRCLE", "DRAGON",
    "FOREST", "FROZEN", "GARDEN", "GUITAR", "HAMMER", "ISLAND", "JUNGLE", "KITTEN", "LADDER",
    "MARBLE", "MIRROR", "ORANGE", "PENCIL", "PLANET", "POCKET", "RABBIT", "ROCKET", "SILVER",
    "SPIDER", "STREAM", "SUMMER", "THRONE", "TUNNEL", "VELVET", "WINDOW", "WINTER", "WIZARD",
    // 7 letters
    "BLANKET", "CAPTAIN", "CHIMNEY", "COMPASS", "CRYSTAL", "DIAMOND", "DOLPHIN", "EMERALD",
    "FACTORY", "FEATHER", "GIRAFFE", "HARVEST", "JOURNEY", "KITCHEN", "LANTERN", "MONSTER",
    "MORNING", "MYSTERY", "NETWORK", "ORCHARD", "PANTHER", "PICTURE", "PLASTIC", "PYRAMID",
    "RAINBOW", "SCIENCE", "SHELTER", "THUNDER", "TRUMPET", "VOLCANO", "WHISPER", "BLOSSOM",
    // 8 letters
    "ABSOLUTE", "BIRTHDAY", "WARDROBE", "CHAMPION", "CHEMICAL", "DAUGHTER", "ELEPHANT",
    "FOUNTAIN", "HOSPITAL", "LANGUAGE", "MOUNTAIN", "NOTEBOOK", "PAINTING", "SUNLIGHT",
    "TRIANGLE", "UMBRELLA",
];

pub fn builtin_dictionary() -> Vec<String> {
    BUILTIN_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Normalize a word list: one word per line, blank lines and `#` comments skipped,
/// non-alphabetic entries dropped, everything uppercased.
pub fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| line.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|line| line.to_ascii_uppercase())
        .collect()
}

pub fn load_dictionary(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_word_list(&content);
    tracing::info!(path = %path.display(), count = words.len(), "loaded dictionary");
    Ok(words)
}
