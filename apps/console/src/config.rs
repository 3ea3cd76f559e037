use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use review_core::DEFAULT_API_BASE;
use serde::Deserialize;
use url::Url;

pub const API_BASE_ENV: &str = "REVIEW_API_BASE";
pub const DEFAULT_ACTOR: &str = "reviewer@i4c";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub actor: String,
    pub export_dir: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            actor: DEFAULT_ACTOR.into(),
            export_dir: PathBuf::from("."),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base: Option<String>,
    actor: Option<String>,
    export_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    fn apply_file(&mut self, file_cfg: FileConfig) {
        if let Some(v) = file_cfg.api_base {
            self.api_base = v;
        }
        if let Some(v) = file_cfg.actor {
            self.actor = v;
        }
        if let Some(v) = file_cfg.export_dir {
            self.export_dir = v;
        }
        if let Some(secs) = file_cfg.request_timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
    }

    /// Command-line values win over file and environment.
    pub fn with_overrides(
        mut self,
        api_base: Option<String>,
        actor: Option<String>,
        export_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        if let Some(v) = api_base {
            self.api_base = v;
        }
        if let Some(v) = actor {
            self.actor = v;
        }
        if let Some(v) = export_dir {
            self.export_dir = v;
        }
        self.finish()
    }

    fn finish(mut self) -> anyhow::Result<Self> {
        self.api_base = normalize_api_base(&self.api_base)?;
        if self.actor.trim().is_empty() {
            bail!("reviewer actor must not be empty");
        }
        Ok(self)
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = parse_file_config(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    }

    apply_env_override(&mut settings, env::var(API_BASE_ENV).ok());
    settings.finish()
}

fn parse_file_config(raw: &str) -> anyhow::Result<FileConfig> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_override(settings: &mut Settings, api_base: Option<String>) {
    if let Some(v) = api_base.filter(|v| !v.trim().is_empty()) {
        settings.api_base = v;
    }
}

pub fn normalize_api_base(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return Ok(DEFAULT_API_BASE.to_string());
    }

    let parsed = Url::parse(raw).with_context(|| format!("invalid store address '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "store address must use http or https, got '{}'",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("store address '{raw}' has no host");
    }
    Ok(raw.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
