use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use starpick_types::GroupSize;
use starpick_types::ui::UiOptions;

use crate::scheduler::Timing;

/// Environment variable that overrides `[roster] path`.
pub const ROSTER_ENV: &str = "STARPICK_ROSTER";

/// Roster file used when nothing else is configured.
pub const DEFAULT_ROSTER_FILE: &str = "names.txt";

#[derive(Debug, Default, Deserialize)]
pub struct StarpickConfig {
    pub app: Option<AppConfig>,
    pub roster: Option<RosterConfig>,
    pub timing: Option<TimingConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for stars, rockets and particles.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable twinkle, meteors and toast motion.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl AppConfig {
    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            ascii_only: self.ascii_only,
            high_contrast: self.high_contrast,
            reduced_motion: self.reduced_motion,
        }
    }
}

/// ```toml
/// [roster]
/// path = "${HOME}/class/names.txt"
/// group_size = 2
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RosterConfig {
    pub path: Option<String>,
    pub group_size: Option<GroupSize>,
}

/// Stage timing overrides. Unset fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TimingConfig {
    pub pause_ms: Option<u64>,
    pub rise_ms: Option<u64>,
    pub flight_speed: Option<f32>,
}

impl TimingConfig {
    #[must_use]
    pub fn apply(&self, mut timing: Timing) -> Timing {
        if let Some(ms) = self.pause_ms {
            timing.pause = Duration::from_millis(ms);
        }
        if let Some(ms) = self.rise_ms {
            timing.rise = Duration::from_millis(ms);
        }
        match self.flight_speed {
            Some(speed) if speed.is_finite() && speed > 0.0 => timing.flight_speed = speed,
            Some(speed) => tracing::warn!(speed, "Ignoring non-positive flight_speed"),
            None => {}
        }
        timing
    }
}

/// Replace `${VAR}` references with their environment values. Missing
/// variables become empty; an unclosed `${` is kept as-is.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand `${VAR}` and a leading `~/`.
#[must_use]
pub fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_env_vars(value);
    if let Some(stripped) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(expanded)
}

/// Where the roster comes from, in priority order: CLI argument,
/// `STARPICK_ROSTER`, `[roster] path`, then `names.txt` in the working
/// directory.
#[must_use]
pub fn resolve_roster_path(cli_arg: Option<&Path>, config: Option<&StarpickConfig>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Ok(value) = env::var(ROSTER_ENV)
        && !value.trim().is_empty()
    {
        return expand_path(&value);
    }
    config
        .and_then(|config| config.roster.as_ref())
        .and_then(|roster| roster.path.as_deref())
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_ROSTER_FILE), expand_path)
}

impl StarpickConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app.as_ref().map(AppConfig::ui_options).unwrap_or_default()
    }

    #[must_use]
    pub fn group_size(&self) -> GroupSize {
        self.roster
            .as_ref()
            .and_then(|roster| roster.group_size)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        match &self.timing {
            Some(overrides) => overrides.apply(Timing::default()),
            None => Timing::default(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".starpick").join("config.toml"))
}
