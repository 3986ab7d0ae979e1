//! Session file loading
//!
//! A session file either lists its steps explicitly, gives a `[pattern]`
//! table, or names a preset. Explicit steps win over a pattern, and a
//! pattern wins over a preset.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use breath_core::config::{
    make_label, AnimationTiming, BreathingPattern, ConfigError, ExerciseConfig, Step, StepId,
    MAX_STEPS,
};

/// Embedded default session (compiled into the binary)
const EMBEDDED_SESSION: &str = include_str!("../../session.toml");

/// Default minimum session length (seconds)
const DEFAULT_MIN_ELAPSED_S: u64 = 60;

/// Session loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("session has more than {MAX_STEPS} steps")]
    TooManySteps,
    #[error("invalid session: {0:?}")]
    Invalid(ConfigError),
    #[error("minimum session of {0} s is too long")]
    MinElapsedOverflow(u64),
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Convert a minimum session length from seconds to milliseconds
pub fn min_elapsed_ms(seconds: u64) -> Result<u64, LoadError> {
    seconds
        .checked_mul(1000)
        .ok_or(LoadError::MinElapsedOverflow(seconds))
}

/// One `[[steps]]` entry
///
/// Omitted fields take the phase defaults: holds show dots, and the label
/// is the phase's usual prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepEntry {
    pub id: StepId,
    pub duration_ms: u32,
    #[serde(default)]
    pub skipped: bool,
    pub show_dots: Option<bool>,
    pub label: Option<String>,
}

impl StepEntry {
    fn into_step(self) -> Result<Step, ConfigError> {
        let mut step = Step::new(self.id, self.duration_ms);
        step.skipped = self.skipped;
        if let Some(show_dots) = self.show_dots {
            step.show_dots = show_dots;
        }
        if let Some(label) = self.label.as_deref() {
            step.label = make_label(label)?;
        }
        Ok(step)
    }
}

/// Session file as written on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionFile {
    /// Named preset ("box", "relaxing", "calm", "coherent")
    pub preset: Option<String>,
    /// Explicit phase durations
    pub pattern: Option<BreathingPattern>,
    /// Explicit step list
    pub steps: Vec<StepEntry>,
    /// Minimum session length counted as done (seconds)
    pub min_elapsed_s: Option<u64>,
    pub vibration_enabled: bool,
    pub timing: AnimationTiming,
}

impl SessionFile {
    /// Resolve into an exercise config
    ///
    /// The returned config is validated: it has at least one active step.
    pub fn into_config(self) -> Result<ExerciseConfig, LoadError> {
        let steps = if !self.steps.is_empty() {
            debug!("Using {} explicit steps", self.steps.len());
            let mut steps = heapless::Vec::new();
            for entry in self.steps {
                steps
                    .push(entry.into_step()?)
                    .map_err(|_| LoadError::TooManySteps)?;
            }
            steps
        } else if let Some(pattern) = self.pattern {
            debug!("Using explicit pattern");
            pattern.steps()
        } else if let Some(name) = self.preset.as_deref() {
            debug!("Using preset '{}'", name);
            BreathingPattern::by_name(name)
                .ok_or_else(|| LoadError::UnknownPreset(name.to_string()))?
                .steps()
        } else {
            BreathingPattern::BOX.steps()
        };

        let config = ExerciseConfig {
            steps,
            vibration_enabled: self.vibration_enabled,
            min_elapsed_ms: min_elapsed_ms(self.min_elapsed_s.unwrap_or(DEFAULT_MIN_ELAPSED_S))?,
            timing: self.timing,
        };
        config.active_steps()?;
        Ok(config)
    }
}

/// Parse a session from TOML text
pub fn parse_session(content: &str) -> Result<ExerciseConfig, LoadError> {
    let file: SessionFile = toml::from_str(content)?;
    file.into_config()
}

/// Load a session from `path`, or the embedded default when `None`
pub fn load_session(path: Option<&Path>) -> Result<ExerciseConfig, LoadError> {
    let config = match path {
        Some(path) => {
            info!("Loading session from {}", path.display());
            let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_session(&content)?
        }
        None => {
            info!("Using embedded session");
            parse_session(EMBEDDED_SESSION)?
        }
    };

    log_config_summary(&config);
    Ok(config)
}

fn log_config_summary(config: &ExerciseConfig) {
    info!("=== Session Summary ===");
    for step in config.steps.iter() {
        if step.skipped {
            debug!("  {:?}: skipped", step.id);
        } else {
            info!("  {:?}: {} ms \"{}\"", step.id, step.duration_ms, step.label);
        }
    }
    info!("  Minimum session: {} ms", config.min_elapsed_ms);
    info!("  Frame interval: {} ms", config.timing.frame_ms);
}
