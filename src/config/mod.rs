use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::series::{SeriesMode, DUAL_AXIS_RANGE_RATIO_THRESHOLD};

/// Environment variable that points at an alternative settings file.
pub const CONFIG_PATH_ENV: &str = "MYMETRICS_CONFIG";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());
        Self::load_from(&config_path)
    }

    /// Defaults, overlaid by `path` (if it exists), overlaid by the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if let Ok(file) = fs::File::open(path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(Result::ok) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path: path.to_path_buf(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse::<f64>().ok())
    }

    /// Ratio at or above which two series lines are drawn on separate axes.
    pub fn dual_axis_ratio_threshold(&self) -> f64 {
        self.get_f64("DUAL_AXIS_RATIO_THRESHOLD")
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(DUAL_AXIS_RANGE_RATIO_THRESHOLD)
    }

    /// Series mode setting: `auto` or one of the mode names.
    pub fn default_series_mode(&self) -> String {
        self.get("DEFAULT_SERIES_MODE")
            .unwrap_or_else(|| crate::series::AUTO_MODE.to_string())
    }

    /// Mode used when a configured or requested mode name is not recognized.
    pub fn fallback_series_mode(&self) -> SeriesMode {
        SeriesMode::default()
    }

    pub fn log_level(&self) -> String {
        self.get("LOG_LEVEL").unwrap_or_else(|| "warn".into())
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "DUAL_AXIS_RATIO_THRESHOLD",
        "DEFAULT_SERIES_MODE",
        "PRETTIFY_MARKDOWN",
        "DEFAULT_COLOR",
        "LOG_LEVEL",
    ];

    KEYS.contains(&k) || k.starts_with("MYMETRICS_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("mymetrics").join(".mymetricsrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert(
        "DUAL_AXIS_RATIO_THRESHOLD".into(),
        DUAL_AXIS_RANGE_RATIO_THRESHOLD.to_string(),
    );
    m.insert("DEFAULT_SERIES_MODE".into(), crate::series::AUTO_MODE.into());
    m.insert("DEFAULT_COLOR".into(), "cyan".into());
    m.insert("LOG_LEVEL".into(), "warn".into());
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".mymetricsrc");
        fs::write(
            &path,
            "# settings\nDEFAULT_SERIES_MODE = dual_axis_double_line\nDUAL_AXIS_RATIO_THRESHOLD=5\n\nnot a pair\n",
        )
        .unwrap();
        let cfg = Config::load_from(&path);
        assert_eq!(cfg.default_series_mode(), "dual_axis_double_line");
        assert_eq!(cfg.dual_axis_ratio_threshold(), 5.0);
        assert_eq!(cfg.get("DEFAULT_COLOR").as_deref(), Some("cyan"));
        assert_eq!(cfg.config_path, path);
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent"));
        assert_eq!(cfg.log_level(), "warn");
        assert!(cfg.get_bool("PRETTIFY_MARKDOWN"));
    }

    #[test]
    fn invalid_threshold_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rc");
        fs::write(&path, "DUAL_AXIS_RATIO_THRESHOLD=-1\n").unwrap();
        assert_eq!(
            Config::load_from(&path).dual_axis_ratio_threshold(),
            DUAL_AXIS_RANGE_RATIO_THRESHOLD
        );
    }

    #[test]
    fn accepted_keys() {
        assert!(is_config_key("LOG_LEVEL"));
        assert!(is_config_key("MYMETRICS_ANYTHING"));
        assert!(!is_config_key("HOME"));
    }
}
