use thiserror::Error;

/// Errors raised by the market data feeds.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("History fetch failed: {0}")]
    HistoryFetch(String),

    #[error("History fetch returned no candles")]
    EmptyHistory,

    #[error("Malformed trade event: {0}")]
    MalformedTrade(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// First `max` characters of `text`, bounding raw feed payloads quoted in
/// error messages. Counts characters rather than bytes so a multi-byte
/// character never gets split.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
