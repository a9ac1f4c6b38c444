//! Analysis parameters and the task-file loader.
//!
//! A task file is a sectioned key/value document (see `Utils::task_parser`):
//! ```text
//! function
//! expression: x^3 - 3*x
//! variable: x
//! domain
//! xmin: -5
//! xmax: 5
//! solver
//! samples: 800
//! tolerance: 1e-6
//! output
//! csv: samples.csv
//! plot_points: 400
//! loglevel: info
//! ```
//! Every key except `function.expression` is optional and falls back to the defaults of
//! [`AnalysisConfig`] and [`AnalysisTask`].
use crate::Utils::task_parser::{DocumentMap, Value, parse_task_document};
use crate::analysis::error::{AnalysisResult, ConfigError};
use itertools::Itertools;
use log::info;
use std::path::{Path, PathBuf};

pub const DEFAULT_VARIABLE: &str = "x";
pub const DEFAULT_XMIN: f64 = -10.0;
pub const DEFAULT_XMAX: f64 = 10.0;
pub const DEFAULT_SAMPLES: usize = 800;
pub const DEFAULT_TOL: f64 = 1e-6;
pub const DEFAULT_PLOT_POINTS: usize = 400;

/// Domain and solver parameters, passed by reference to every stage of the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// name of the free variable
    pub variable: String,
    pub xmin: f64,
    pub xmax: f64,
    /// number of evenly spaced samples of f' used to bracket its zeros
    pub samples: usize,
    /// |f'| <= tol counts as zero when labelling intervals
    pub tol: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            xmin: DEFAULT_XMIN,
            xmax: DEFAULT_XMAX,
            samples: DEFAULT_SAMPLES,
            tol: DEFAULT_TOL,
        }
    }
}

impl AnalysisConfig {
    /// Default configuration on the domain `[xmin, xmax]`.
    pub fn on_domain(xmin: f64, xmax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.xmin.is_finite() || !self.xmax.is_finite() {
            return Err(ConfigError::NonFiniteBound {
                xmin: self.xmin,
                xmax: self.xmax,
            });
        }
        if self.xmin >= self.xmax {
            return Err(ConfigError::EmptyDomain {
                xmin: self.xmin,
                xmax: self.xmax,
            });
        }
        if self.samples < 2 {
            return Err(ConfigError::TooFewSamples(self.samples));
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tol));
        }
        if !is_identifier(&self.variable) || matches!(self.variable.as_str(), "pi" | "e") {
            return Err(ConfigError::InvalidVariable(self.variable.clone()));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A complete run read from a task file: what to analyse and where to put the output.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTask {
    pub expression: String,
    pub config: AnalysisConfig,
    pub csv: Option<PathBuf>,
    pub plot_points: usize,
    pub loglevel: Option<String>,
}

impl AnalysisTask {
    pub fn new(expression: &str, config: AnalysisConfig) -> Self {
        Self {
            expression: expression.to_string(),
            config,
            csv: None,
            plot_points: DEFAULT_PLOT_POINTS,
            loglevel: None,
        }
    }

    pub fn from_file(path: &Path) -> AnalysisResult<Self> {
        let text = std::fs::read_to_string(path)?;
        info!("task file {} loaded", path.display());
        Ok(Self::from_task_str(&text)?)
    }

    /// Builds a validated task from the text of a task file.
    pub fn from_task_str(text: &str) -> Result<Self, ConfigError> {
        let doc = parse_task_document(text).map_err(ConfigError::TaskFile)?;
        let reader = TaskReader { doc: &doc };

        let expression = reader
            .string("function", "expression")?
            .ok_or_else(|| ConfigError::MissingKey {
                section: "function".to_string(),
                key: "expression".to_string(),
            })?;
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            variable: reader
                .string("function", "variable")?
                .unwrap_or(defaults.variable),
            xmin: reader.float("domain", "xmin")?.unwrap_or(defaults.xmin),
            xmax: reader.float("domain", "xmax")?.unwrap_or(defaults.xmax),
            samples: reader.count("solver", "samples")?.unwrap_or(defaults.samples),
            tol: reader.float("solver", "tolerance")?.unwrap_or(defaults.tol),
        };
        config.validate()?;

        Ok(Self {
            expression,
            config,
            csv: reader.string("output", "csv")?.map(PathBuf::from),
            plot_points: reader
                .count("output", "plot_points")?
                .unwrap_or(DEFAULT_PLOT_POINTS),
            loglevel: reader.string("output", "loglevel")?,
        })
    }
}

/// Typed access to the single value stored under `section.key`.
struct TaskReader<'a> {
    doc: &'a DocumentMap,
}

impl TaskReader<'_> {
    fn value(&self, section: &str, key: &str) -> Result<Option<&Value>, ConfigError> {
        let Some(values) = self.doc.get(section).and_then(|s| s.get(key)) else {
            return Ok(None);
        };
        match values.as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(value)),
            _ => {
                let joined = values.iter().map(Value::to_string_value).join(", ");
                Err(self.invalid(section, key, &joined))
            }
        }
    }

    fn invalid(&self, section: &str, key: &str, value: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn string(&self, section: &str, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.value(section, key)?.map(Value::to_string_value))
    }

    fn float(&self, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
        self.value(section, key)?
            .map(|v| v.as_float().ok_or_else(|| self.invalid(section, key, &v.to_string_value())))
            .transpose()
    }

    fn count(&self, section: &str, key: &str) -> Result<Option<usize>, ConfigError> {
        self.value(section, key)?
            .map(|v| {
                v.as_integer()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or_else(|| self.invalid(section, key, &v.to_string_value()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.variable, "x");
        assert_eq!((cfg.xmin, cfg.xmax), (-10.0, 10.0));
        assert_eq!(cfg.samples, 800);
        assert_eq!(cfg.tol, 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert_eq!(
            AnalysisConfig::on_domain(1.0, 1.0).validate(),
            Err(ConfigError::EmptyDomain { xmin: 1.0, xmax: 1.0 })
        );
        assert!(matches!(
            AnalysisConfig::on_domain(f64::NEG_INFINITY, 1.0).validate(),
            Err(ConfigError::NonFiniteBound { .. })
        ));
        let cfg = AnalysisConfig {
            samples: 1,
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::TooFewSamples(1)));
        let cfg = AnalysisConfig {
            tol: -1e-3,
            ..AnalysisConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidTolerance(-1e-3)));
        for name in ["", "2x", "pi", "e", "x y"] {
            let cfg = AnalysisConfig {
                variable: name.to_string(),
                ..AnalysisConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidVariable(name.to_string())));
        }
    }

    #[test]
    fn test_task_file_with_all_sections() {
        let text = "function\nexpression: t^3 - 3*t\nvariable: t\ndomain\nxmin: -5\nxmax: 2.5\n\
                    solver\nsamples: 200\ntolerance: 1e-8\noutput\ncsv: out.csv\nplot_points: 50\nloglevel: debug\n";
        let task = AnalysisTask::from_task_str(text).unwrap();
        assert_eq!(task.expression, "t^3 - 3*t");
        assert_eq!(
            task.config,
            AnalysisConfig {
                variable: "t".to_string(),
                xmin: -5.0,
                xmax: 2.5,
                samples: 200,
                tol: 1e-8,
            }
        );
        assert_eq!(task.csv, Some(PathBuf::from("out.csv")));
        assert_eq!(task.plot_points, 50);
        assert_eq!(task.loglevel.as_deref(), Some("debug"));
    }

    #[test]
    fn test_task_file_defaults() {
        let task = AnalysisTask::from_task_str("function\nexpression: sin(x)\n").unwrap();
        assert_eq!(task, AnalysisTask::new("sin(x)", AnalysisConfig::default()));
    }

    #[test]
    fn test_task_file_errors() {
        assert_eq!(
            AnalysisTask::from_task_str("domain\nxmin: 0\n"),
            Err(ConfigError::MissingKey {
                section: "function".to_string(),
                key: "expression".to_string()
            })
        );
        assert_eq!(
            AnalysisTask::from_task_str("function\nexpression: x\ndomain\nxmin: left\n"),
            Err(ConfigError::InvalidValue {
                section: "domain".to_string(),
                key: "xmin".to_string(),
                value: "left".to_string()
            })
        );
        assert_eq!(
            AnalysisTask::from_task_str("function\nexpression: x\ndomain\nxmin: 3\nxmax: 1\n"),
            Err(ConfigError::EmptyDomain { xmin: 3.0, xmax: 1.0 })
        );
        assert!(matches!(
            AnalysisTask::from_task_str("function\n"),
            Err(ConfigError::TaskFile(_))
        ));
    }

    #[test]
    fn test_task_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.txt");
        std::fs::write(&path, "function\nexpression: x^2\ndomain\nxmin: -1\nxmax: 1\n").unwrap();
        let task = AnalysisTask::from_file(&path).unwrap();
        assert_eq!(task.config, AnalysisConfig::on_domain(-1.0, 1.0));
        assert!(AnalysisTask::from_file(&dir.path().join("missing.txt")).is_err());
    }
}
