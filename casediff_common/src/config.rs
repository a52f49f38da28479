use crate::{CaseDiffError, CaseEquality, CompareMethod, Options, OutputMode};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "casediff.toml";

/// Environment variables consulted between flags and the config file
pub const ENV_PATTERN: &str = "PATTERN";
pub const ENV_EPSILON: &str = "EPSILON";
pub const ENV_ONECASE: &str = "ONECASE";
pub const ENV_METHOD: &str = "METHOD";
pub const ENV_FORMATTING: &str = "FORMATTING";

/// A partial set of options. One layer each for flags, environment and
/// config file; unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionOverrides {
    pub pattern: Option<String>,
    pub one_case: Option<bool>,
    pub method: Option<CompareMethod>,
    pub epsilon: Option<f64>,
    pub equal_header: Option<bool>,
    pub formatting: Option<OutputMode>,
    pub summary: Option<bool>,
    pub suppress: Option<bool>,
    pub color: Option<bool>,
    pub wrap_width: Option<usize>,
}

impl OptionOverrides {
    /// Read the recognised environment variables through `lookup`.
    pub fn from_env<F>(lookup: F) -> Result<Self, CaseDiffError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layer = OptionOverrides {
            pattern: lookup(ENV_PATTERN),
            ..Default::default()
        };

        if let Some(value) = lookup(ENV_EPSILON) {
            let epsilon = value.trim().parse::<f64>().map_err(|e| {
                CaseDiffError::Config(format!("{ENV_EPSILON}={value}: {e}"))
            })?;
            layer.epsilon = Some(epsilon);
        }
        if let Some(value) = lookup(ENV_ONECASE) {
            layer.one_case = Some(parse_flag(ENV_ONECASE, &value)?);
        }
        if let Some(value) = lookup(ENV_METHOD) {
            let method = value
                .parse::<CompareMethod>()
                .map_err(|e| CaseDiffError::Config(format!("{ENV_METHOD}: {e}")))?;
            layer.method = Some(method);
        }
        if let Some(value) = lookup(ENV_FORMATTING) {
            let formatting = value
                .parse::<OutputMode>()
                .map_err(|e| CaseDiffError::Config(format!("{ENV_FORMATTING}: {e}")))?;
            layer.formatting = Some(formatting);
        }

        Ok(layer)
    }

    /// Read the process environment.
    pub fn from_process_env() -> Result<Self, CaseDiffError> {
        Self::from_env(|key| std::env::var(key).ok())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, CaseDiffError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(CaseDiffError::Config(format!(
            "{name}={other}: expected a boolean"
        ))),
    }
}

impl Options {
    /// Resolve options from layers given in decreasing precedence.
    pub fn layered(layers: &[&OptionOverrides]) -> Result<Options, CaseDiffError> {
        fn pick<T: Clone>(
            layers: &[&OptionOverrides],
            field: impl Fn(&OptionOverrides) -> &Option<T>,
        ) -> Option<T> {
            layers.iter().find_map(|layer| field(layer).clone())
        }

        let defaults = Options::default();
        let options = Options {
            pattern: pick(layers, |l| &l.pattern).unwrap_or(defaults.pattern),
            one_case: pick(layers, |l| &l.one_case).unwrap_or(defaults.one_case),
            method: pick(layers, |l| &l.method).unwrap_or(defaults.method),
            epsilon: pick(layers, |l| &l.epsilon).unwrap_or(defaults.epsilon),
            equality: match pick(layers, |l| &l.equal_header) {
                Some(true) => CaseEquality::Header,
                Some(false) => CaseEquality::Body,
                None => defaults.equality,
            },
            output: pick(layers, |l| &l.formatting).unwrap_or(defaults.output),
            summary: pick(layers, |l| &l.summary).unwrap_or(defaults.summary),
            suppress: pick(layers, |l| &l.suppress).unwrap_or(defaults.suppress),
            color: pick(layers, |l| &l.color).unwrap_or(defaults.color),
            wrap_width: pick(layers, |l| &l.wrap_width).unwrap_or(defaults.wrap_width),
        };

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), CaseDiffError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(CaseDiffError::Config(format!(
                "epsilon must be a non-negative number, got {}",
                self.epsilon
            )));
        }
        if !self.one_case && self.pattern.is_empty() {
            return Err(CaseDiffError::Config("case pattern is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub overrides: OptionOverrides,
    pub path: Option<PathBuf>,
    pub exists: bool,
}

/// Load `casediff.toml`. An explicit path must exist; otherwise the file
/// next to the executable wins over the platform config directory, and a
/// missing file yields an empty layer.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, CaseDiffError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_config_path(),
    };

    let Some(path) = path else {
        return Ok(LoadedConfig {
            overrides: OptionOverrides::default(),
            path: None,
            exists: false,
        });
    };

    let exists = path.exists();
    if !exists && explicit.is_some() {
        return Err(CaseDiffError::io(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
        ));
    }

    let overrides = if exists {
        let data = fs::read_to_string(&path).map_err(|e| CaseDiffError::io(&path, e))?;
        parse_config(&data)?
    } else {
        OptionOverrides::default()
    };

    Ok(LoadedConfig {
        overrides,
        path: Some(path),
        exists,
    })
}

pub fn parse_config(data: &str) -> Result<OptionOverrides, CaseDiffError> {
    toml::from_str(data).map_err(|e| CaseDiffError::Serialization(e.to_string()))
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(portable_path) = portable_config_path() {
        if portable_path.exists() {
            return Some(portable_path);
        }
    }

    ProjectDirs::from("", "", "casediff").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn portable_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}
