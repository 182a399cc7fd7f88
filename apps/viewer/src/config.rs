use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use chrono::{DateTime, Utc};
use client_core::SequencerConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "invitation.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Guest records endpoint; `None` disables lookups.
    pub api_url: Option<String>,
    pub api_key: String,
    pub transliterate_url: Option<String>,
    /// RFC 3339 instant of the wedding ceremony.
    pub wedding_at: String,
    pub request_timeout_ms: u64,
    pub gate_timeout_ms: u64,
    pub reveal_duration_ms: u64,
    pub splash_enabled: bool,
    pub gate_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: Some(
                "https://app.base44.com/api/apps/69663f1704636ad61e212b37/entities/Guest".into(),
            ),
            api_key: String::new(),
            transliterate_url: None,
            wedding_at: "2026-04-28T18:00:00+05:30".into(),
            request_timeout_ms: 8_000,
            gate_timeout_ms: 10_000,
            reveal_duration_ms: 2_500,
            splash_enabled: true,
            gate_enabled: true,
        }
    }
}

impl Settings {
    pub fn wedding_at(&self) -> anyhow::Result<DateTime<Utc>> {
        let parsed = DateTime::parse_from_rfc3339(self.wedding_at.trim())
            .with_context(|| format!("invalid wedding_at '{}'", self.wedding_at))?;
        Ok(parsed.with_timezone(&Utc))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn sequencer_config(&self) -> anyhow::Result<SequencerConfig> {
        Ok(SequencerConfig {
            splash_enabled: self.splash_enabled,
            gate_enabled: self.gate_enabled,
            gate_timeout: Duration::from_millis(self.gate_timeout_ms),
            reveal_duration: Duration::from_millis(self.reveal_duration_ms),
            ..SequencerConfig::new(self.wedding_at()?)
        })
    }

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "api_url" => self.api_url = non_empty(value),
            "api_key" => self.api_key = value.to_string(),
            "transliterate_url" => self.transliterate_url = non_empty(value),
            "wedding_at" => self.wedding_at = value.to_string(),
            "request_timeout_ms" => set_parsed(&mut self.request_timeout_ms, key, value),
            "gate_timeout_ms" => set_parsed(&mut self.gate_timeout_ms, key, value),
            "reveal_duration_ms" => set_parsed(&mut self.reveal_duration_ms, key, value),
            "splash_enabled" => set_parsed(&mut self.splash_enabled, key, value),
            "gate_enabled" => set_parsed(&mut self.gate_enabled, key, value),
            _ => warn!(key, "config: unknown setting ignored"),
        }
    }
}

/// Environment variables checked per setting, later names win.
const ENV_KEYS: &[(&str, &[&str])] = &[
    ("api_url", &["INVITE_API_URL", "APP__API_URL"]),
    ("api_key", &["INVITE_API_KEY", "APP__API_KEY"]),
    ("transliterate_url", &["APP__TRANSLITERATE_URL"]),
    ("wedding_at", &["APP__WEDDING_AT"]),
    ("request_timeout_ms", &["APP__REQUEST_TIMEOUT_MS"]),
    ("gate_timeout_ms", &["APP__GATE_TIMEOUT_MS"]),
    ("reveal_duration_ms", &["APP__REVEAL_DURATION_MS"]),
    ("splash_enabled", &["APP__SPLASH_ENABLED"]),
    ("gate_enabled", &["APP__GATE_ENABLED"]),
];

/// Defaults, then `invitation.toml` (or the explicit `path`), then the
/// process environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                if let Err(err) = apply_file(&mut settings, &raw) {
                    warn!(error = %err, "config: ignoring unreadable {DEFAULT_CONFIG_FILE}");
                }
            }
        }
    }

    for (key, names) in ENV_KEYS {
        for name in *names {
            if let Some(value) = env(name) {
                settings.set(key, &value);
            }
        }
    }

    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let table = toml::from_str::<toml::Table>(raw)?;
    for (key, value) in &table {
        match value {
            toml::Value::String(s) => settings.set(key, s),
            other => settings.set(key, &other.to_string()),
        }
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, value: &str) {
    match value.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value, "config: unparseable value ignored"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
