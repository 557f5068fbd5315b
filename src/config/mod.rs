use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .sconrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().flatten() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    pub fn endpoint_url(&self) -> String {
        self.get("ENDPOINT_URL").unwrap()
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.get_u64("REQUEST_TIMEOUT").unwrap_or(30)
    }

    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(self.get("HISTORY_PATH").unwrap())
    }
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or SCON_* for forward-compat
    const KEYS: &[&str] = &[
        "ENDPOINT_URL",
        "REQUEST_TIMEOUT",
        "LANGUAGES_PATH",
        "MODE_RULES_PATH",
        "HISTORY_PATH",
        "HISTORY_LENGTH",
        "DEFAULT_COLOR",
    ];

    KEYS.contains(&k) || k.starts_with("SCON_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("scon").join(".sconrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    // Paths
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    let scon_dir = base.join("scon");

    m.insert(
        "HISTORY_PATH".into(),
        scon_dir.join("history").to_string_lossy().into_owned(),
    );

    // Numbers
    m.insert("HISTORY_LENGTH".into(), "100".into());
    m.insert("REQUEST_TIMEOUT".into(), "30".into());

    // Strings
    m.insert(
        "ENDPOINT_URL".into(),
        "http://localhost:8080/system/console/sc".into(),
    );
    m.insert("DEFAULT_COLOR".into(), "cyan".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_console_timeout() {
        let cfg = Config {
            inner: default_map(),
            config_path: default_config_path(),
        };
        assert_eq!(cfg.request_timeout_secs(), 30);
        assert!(cfg.endpoint_url().ends_with("/system/console/sc"));
    }

    #[test]
    fn unknown_env_keys_are_ignored() {
        assert!(!is_config_key("PATH"));
        assert!(is_config_key("ENDPOINT_URL"));
        assert!(is_config_key("SCON_EXPERIMENT"));
    }
}
