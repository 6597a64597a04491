use std::{env, fmt::Display, str::FromStr};

use tracing::info;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: String,
    /// Radius applied when a caregiver profile has none configured.
    pub default_radius_km: f64,
    /// Seconds a flash card stays up before auto-dismissing.
    pub auto_hide_secs: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            bind_addr: try_load("NURSELINE_ADDR", "127.0.0.1:3000"),
            db_path: try_load("NURSELINE_DB", "nurseline.sqlite3"),
            default_radius_km: try_load("NURSELINE_RADIUS_KM", "25.0"),
            auto_hide_secs: try_load("NURSELINE_AUTO_HIDE_SECS", "45"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            db_path: "nurseline.sqlite3".into(),
            default_radius_km: 25.0,
            auto_hide_secs: 45,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match raw.parse() {
        Ok(v) => v,
        Err(e) => panic!("invalid {key} value {raw:?}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_env_fallbacks() {
        let cfg = Config::default();
        assert_eq!(cfg.auto_hide_secs, 45);
        assert_eq!(cfg.default_radius_km, 25.0);
    }
}
