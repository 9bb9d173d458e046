//! Tic-tac-toe matchmaking server.
//!
//! Environment:
//!
//! - `MATCHBOARD_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `MATCHBOARD_STRICT_TURNS`: only the participant on the side to move may move (default off)
//! - `MATCHBOARD_REPORT_REJECTIONS`: send `moveRejected` (default off)
//! - `RUST_LOG`: log filter (default `info`)

use matchboard::prelude::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), MatchboardError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MATCHBOARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let defaults = LobbyConfig::default();
    let config = LobbyConfig {
        strict_turns: env_flag("MATCHBOARD_STRICT_TURNS", defaults.strict_turns),
        report_rejections: env_flag("MATCHBOARD_REPORT_REJECTIONS", defaults.report_rejections),
        ..defaults
    };
    tracing::info!(%addr, ?config, "starting tic-tac-toe server");

    MatchboardServer::builder()
        .bind(&addr)
        .lobby_config(config)
        .build()
        .await?
        .run()
        .await
}

/// Reads a boolean flag, falling back to `default` when unset or unparseable.
fn env_flag(name: &str, default: bool) -> bool {
    let Ok(raw) = std::env::var(name) else {
        return default;
    };
    match parse_flag(&raw) {
        Some(value) => value,
        None => {
            tracing::warn!(name, value = %raw, default, "unrecognised flag value, using default");
            default
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
