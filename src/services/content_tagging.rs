//! Keyword heuristics shared by the news and social adapters.
//!
//! Both are plain substring scans over lower-cased text. They do not handle
//! negation ("not a crash" counts as negative), do not weight terms, and
//! short keywords match inside longer words ("sol" in "solution"). Tests pin
//! this behaviour down as-is.

use crate::models::content::Sentiment;

/// Ordered (keyword, symbol) pairs used to tag related coins.
pub const COIN_KEYWORDS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("btc", "BTC"),
    ("ethereum", "ETH"),
    ("eth", "ETH"),
    ("solana", "SOL"),
    ("sol", "SOL"),
    ("ripple", "XRP"),
    ("xrp", "XRP"),
    ("cardano", "ADA"),
    ("ada", "ADA"),
    ("dogecoin", "DOGE"),
    ("doge", "DOGE"),
    ("polkadot", "DOT"),
    ("dot", "DOT"),
    ("avalanche", "AVAX"),
    ("avax", "AVAX"),
    ("chainlink", "LINK"),
    ("link", "LINK"),
    ("polygon", "MATIC"),
    ("matic", "MATIC"),
    ("shiba", "SHIB"),
    ("shib", "SHIB"),
    ("litecoin", "LTC"),
    ("ltc", "LTC"),
    ("tron", "TRX"),
    ("trx", "TRX"),
];

pub const POSITIVE_WORDS: &[&str] = &[
    "bull",
    "surge",
    "rally",
    "gain",
    "rise",
    "soar",
    "high",
    "record",
    "adoption",
    "approve",
    "launch",
    "partnership",
    "upgrade",
    "growth",
    "buy",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bear",
    "crash",
    "drop",
    "fall",
    "plunge",
    "hack",
    "scam",
    "fraud",
    "ban",
    "reject",
    "warning",
    "risk",
    "sell",
    "dump",
    "fear",
    "lawsuit",
];

/// Coin symbols mentioned in `text`, each at most once, in table order.
pub fn extract_related_assets(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut symbols: Vec<String> = Vec::new();

    for (keyword, symbol) in COIN_KEYWORDS {
        if lower.contains(keyword) && !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }

    symbols
}

/// Net count of positive minus negative list words present in `text`.
pub fn sentiment_score(text: &str) -> i32 {
    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as i32;

    hits(POSITIVE_WORDS) - hits(NEGATIVE_WORDS)
}

pub fn analyze_sentiment(text: &str) -> Sentiment {
    match sentiment_score(text) {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
