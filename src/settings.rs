use config::Config;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://boss.az";
const DEFAULT_START_URL: &str =
    "https://boss.az/resumes?action=index&controller=resumes&only_path=true&page=1&type=resumes";
const DEFAULT_DB_PATH: &str = "data/resumes.sqlite";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Runtime settings, overridable via BOSS_* environment variables
/// (BOSS_DELAY_MS, BOSS_START_URL, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub start_url: String,
    pub db_path: String,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.into(),
            start_url: DEFAULT_START_URL.into(),
            db_path: DEFAULT_DB_PATH.into(),
            delay_ms: 2000,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

pub fn load() -> Settings {
    Config::builder()
        .add_source(config::Environment::with_prefix("BOSS"))
        .build()
        .and_then(|c| c.try_deserialize())
        .unwrap_or_else(|e| {
            warn!("Falling back to default settings: {}", e);
            Settings::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_resume_listing() {
        let s = Settings::default();
        assert!(s.start_url.starts_with(&s.base_url));
        assert!(s.start_url.contains("type=resumes"));
        assert_eq!(s.delay_ms, 2000);
    }
}
