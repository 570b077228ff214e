use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::DEFAULT_TOP_SCORES;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tick_rate: Duration,
    pub log_limit: usize,
    pub top_scores: usize,
    pub auto_calc: bool,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            log_limit: 200,
            top_scores: DEFAULT_TOP_SCORES,
            auto_calc: false,
            snapshot_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        let tick_ms = env_u64("ODDS_APEX_TICK_MS")
            .unwrap_or(d.tick_rate.as_millis() as u64)
            .clamp(50, 2000);
        let log_limit = env_u64("ODDS_APEX_LOG_LIMIT")
            .map(|v| v as usize)
            .unwrap_or(d.log_limit)
            .clamp(20, 2000);
        let top_scores = env_u64("ODDS_APEX_TOP_SCORES")
            .map(|v| v as usize)
            .unwrap_or(d.top_scores)
            .clamp(1, 10);
        let snapshot_path = env::var("ODDS_APEX_SNAPSHOT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            tick_rate: Duration::from_millis(tick_ms),
            log_limit,
            top_scores,
            auto_calc: env_bool("ODDS_APEX_AUTO_CALC", d.auto_calc),
            snapshot_path,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
