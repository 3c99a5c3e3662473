//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{VitrineError, VitrineResult};

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG` overrides `config.level`. With `config.file` set, records are
/// appended to that file (created along with its directory) instead of
/// going to stderr. A subscriber installed earlier is left in place.
pub fn init_logging(config: &LoggingConfig) -> VitrineResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };
    let to_file = config.file.is_some();
    let writer = make_writer(config)?;

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(!to_file)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
    Ok(())
}

fn level_filter(level: &str) -> VitrineResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| VitrineError::config(format!("invalid logging.level {level:?}: {e}")))
}

fn make_writer(config: &LoggingConfig) -> VitrineResult<BoxMakeWriter> {
    let Some(path) = &config.file else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_level_filter_rejects_bad_directive() {
        assert!(level_filter("vitrine_motion_core=debug,warn").is_ok());
        assert!(matches!(
            level_filter("vitrine=loudest"),
            Err(VitrineError::Config { .. })
        ));
    }

    #[test]
    fn test_file_writer_appends() {
        let dir = std::env::temp_dir().join(format!("vitrine-log-{}", std::process::id()));
        let path = dir.join("nested").join("vitrine.log");
        let config = LoggingConfig {
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };

        for line in ["first\n", "second\n"] {
            let writer = make_writer(&config).unwrap();
            writer.make_writer().write_all(line.as_bytes()).unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        std::fs::remove_dir_all(&dir).ok();
    }
}
