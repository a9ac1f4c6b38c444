#![allow(non_snake_case)]
use RustedExtrema::Utils::logger::{init_logging, parse_level};
use RustedExtrema::analysis::config::{AnalysisConfig, AnalysisTask};
use RustedExtrema::analysis::error::{AnalysisResult, ConfigError};
use RustedExtrema::analysis::pipeline::FunctionAnalyzer;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rusted_extrema")]
#[command(version)]
#[command(
    about = "Critical points, monotonicity intervals and local extrema of f(x)",
    long_about = None
)]
struct Cli {
    /// Function of x, e.g. "x^3 - 3*x"
    #[arg(required_unless_present = "task")]
    expression: Option<String>,

    /// Left end of the domain
    #[arg(requires = "xmax", allow_negative_numbers = true)]
    xmin: Option<f64>,

    /// Right end of the domain
    #[arg(allow_negative_numbers = true)]
    xmax: Option<f64>,

    /// Number of samples of f' used to bracket its zeros
    samples: Option<usize>,

    /// |f'| at or below this counts as zero
    tol: Option<f64>,

    /// Read the analysis from a task file instead
    #[arg(long, conflicts_with = "expression")]
    task: Option<PathBuf>,

    /// Write x, f(x), f'(x) samples to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace); also writes a log file
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn task(self) -> AnalysisResult<AnalysisTask> {
        let mut task = match (self.task, self.expression) {
            (Some(path), _) => AnalysisTask::from_file(&path)?,
            (None, Some(expression)) => {
                let mut config = AnalysisConfig::default();
                if let (Some(xmin), Some(xmax)) = (self.xmin, self.xmax) {
                    config.xmin = xmin;
                    config.xmax = xmax;
                }
                if let Some(samples) = self.samples {
                    config.samples = samples;
                }
                if let Some(tol) = self.tol {
                    config.tol = tol;
                }
                AnalysisTask::new(&expression, config)
            }
            (None, None) => {
                return Err(ConfigError::CommandLine("no expression given".to_string()).into());
            }
        };
        if self.csv.is_some() {
            task.csv = self.csv;
        }
        if self.log.is_some() {
            task.loglevel = self.log;
        }
        Ok(task)
    }
}

fn run(cli: Cli) -> AnalysisResult<()> {
    let task = cli.task()?;
    let level = match task.loglevel.as_deref() {
        Some(level) => parse_level(level).map_err(|_| ConfigError::InvalidValue {
            section: "output".to_string(),
            key: "loglevel".to_string(),
            value: level.to_string(),
        })?,
        None => log::LevelFilter::Warn,
    };
    if let Some(file) = init_logging(level, task.loglevel.is_some())? {
        info!("logging to {}", file);
    }

    // domain errors surface here, before the expression is parsed
    let analyzer = FunctionAnalyzer::new(task.config.clone())?;
    let report = analyzer.analyze(&task.expression)?;

    println!("{}", report.summary_table());
    println!("LaTeX:");
    println!("  f   = {}", report.function_latex);
    println!("  f'  = {}", report.first_derivative_latex);
    println!("  f'' = {}", report.second_derivative_latex);

    if let Some(path) = &task.csv {
        report.save_samples_csv(path, task.plot_points)?;
        println!("\n{} samples written to {}", task.plot_points, path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
