use chrono::Local;
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Level filter from its name: off, error, warn, info, debug or trace (any case).
pub fn parse_level(level: &str) -> Result<LevelFilter, log::ParseLevelError> {
    level.trim().parse::<LevelFilter>()
}

/// Terminal logger, plus a `log_<date>_<time>.txt` file when `log_file` is set.
/// Returns the name of the log file. A logger that is already installed is kept.
pub fn init_logging(level: LevelFilter, log_file: bool) -> std::io::Result<Option<String>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let mut name = None;
    if log_file && level != LevelFilter::Off {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(
            level,
            Config::default(),
            File::create(&file_name)?,
        ));
        name = Some(file_name);
    }
    if CombinedLogger::init(loggers).is_err() {
        log::debug!("logger already initialized");
    }
    Ok(name)
}

/// Writes one header row and then the rows; `None` becomes an empty cell.
pub fn save_columns_to_csv(
    path: &Path,
    headers: &[&str],
    rows: &[Vec<Option<f64>>],
) -> Result<(), csv::Error> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(
            row.iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" Info ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::Trace);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_level("loud").is_err());
        assert!(parse_level("").is_err());
    }

    #[test]
    fn test_save_columns_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        let rows = vec![
            vec![Some(-1.0), None, Some(-1.0)],
            vec![Some(1.0), Some(0.0), Some(1.0)],
        ];
        save_columns_to_csv(&path, &["x", "f", "df"], &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "x,f,df\n-1,,-1\n1,0,1\n");
    }

    #[test]
    fn test_save_columns_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("samples.csv");
        assert!(save_columns_to_csv(&path, &["x"], &[]).is_err());
    }
}
