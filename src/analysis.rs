//! Function analysis on a bounded domain: configuration, monotonicity intervals,
//! classification of critical points and the pipeline tying them to the symbolic and
//! numerical layers.
//!
//! # Example
//! ```
//! use RustedExtrema::analysis::config::AnalysisConfig;
//! use RustedExtrema::analysis::extrema::ExtremumKind;
//! use RustedExtrema::analysis::pipeline::FunctionAnalyzer;
//! let analyzer = FunctionAnalyzer::new(AnalysisConfig::on_domain(-3.0, 3.0)).unwrap();
//! let report = analyzer.analyze("x^3 - 3*x").unwrap();
//! assert_eq!(report.critical_points, vec![-1.0, 1.0]);
//! assert_eq!(report.extrema[0].kind, ExtremumKind::LocalMax);
//! ```
/// domain, sampling and tolerance parameters; task-file loader
pub mod config;
pub mod error;
/// second-derivative test with a sign-change fallback
pub mod extrema;
/// monotonicity labels between breakpoints
pub mod intervals;
pub mod pipeline;
