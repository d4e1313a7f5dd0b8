use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub coin_id: String,
    pub vs_currency: String,
    /// Trailing window of daily candles requested from the API.
    pub days: u32,
    pub ma_window: usize,
    pub bb_window: usize,
    pub bb_std_dev: f64,
    /// Seconds between refresh cycles.
    pub refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coin_id: "bitcoin".to_string(),
            vs_currency: "usd".to_string(),
            days: 30,
            ma_window: 20,
            bb_window: 10,
            bb_std_dev: 1.5,
            refresh_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn sanitized(mut self) -> Self {
        let defaults = AppConfig::default();

        if self.coin_id.trim().is_empty() {
            self.coin_id = defaults.coin_id;
        }

        if self.vs_currency.trim().is_empty() {
            self.vs_currency = defaults.vs_currency;
        }

        if self.days == 0 {
            self.days = defaults.days;
        }

        if self.ma_window == 0 {
            self.ma_window = defaults.ma_window;
        }

        if self.bb_window == 0 {
            self.bb_window = defaults.bb_window;
        }

        if !self.bb_std_dev.is_finite() || self.bb_std_dev <= 0.0 {
            self.bb_std_dev = defaults.bb_std_dev;
        }

        if self.refresh_secs == 0 {
            self.refresh_secs = defaults.refresh_secs;
        }

        self
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".btcdash.json")
}

pub fn load_config(path: &Path) -> AppConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppConfig::default(),
    };

    serde_json::from_str::<AppConfig>(&contents)
        .map(|cfg| cfg.sanitized())
        .unwrap_or_default()
}

pub fn save_config(path: &Path, config: &AppConfig) -> std::io::Result<()> {
    let payload = serde_json::to_string_pretty(config)?;
    std::fs::write(path, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_the_daily_btc_chart() {
        let config = AppConfig::default();
        assert_eq!(config.coin_id, "bitcoin");
        assert_eq!(config.vs_currency, "usd");
        assert_eq!(config.days, 30);
        assert_eq!(config.ma_window, 20);
        assert_eq!(config.bb_window, 10);
        assert!((config.bb_std_dev - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sanitized_restores_zeroed_fields() {
        let config = AppConfig {
            coin_id: "  ".to_string(),
            vs_currency: String::new(),
            days: 0,
            ma_window: 0,
            bb_window: 0,
            bb_std_dev: -2.0,
            refresh_secs: 0,
        }
        .sanitized();

        let defaults = AppConfig::default();
        assert_eq!(config.coin_id, defaults.coin_id);
        assert_eq!(config.vs_currency, defaults.vs_currency);
        assert_eq!(config.days, defaults.days);
        assert_eq!(config.ma_window, defaults.ma_window);
        assert_eq!(config.bb_window, defaults.bb_window);
        assert!((config.bb_std_dev - defaults.bb_std_dev).abs() < f64::EPSILON);
        assert_eq!(config.refresh_secs, defaults.refresh_secs);
    }

    #[test]
    fn sanitized_rejects_nan_band_multiplier() {
        let config = AppConfig {
            bb_std_dev: f64::NAN,
            ..AppConfig::default()
        }
        .sanitized();
        assert!((config.bb_std_dev - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let config = AppConfig {
            coin_id: "ethereum".to_string(),
            refresh_secs: 300,
            ..AppConfig::default()
        }
        .sanitized();
        assert_eq!(config.coin_id, "ethereum");
        assert_eq!(config.refresh_secs, 300);
    }

    #[test]
    fn load_config_falls_back_on_missing_file() {
        let config = load_config(Path::new("/nonexistent/.btcdash.json"));
        assert_eq!(config.coin_id, "bitcoin");
    }
}
