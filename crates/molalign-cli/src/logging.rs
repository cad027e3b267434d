use crate::error::{CliError, Result};
use crate::ui::UiEvent;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Routes formatted log lines through the UI channel so they print above the
/// progress bars instead of tearing them.
struct UiLogWriter {
    sender: mpsc::Sender<UiEvent>,
    buffer: Vec<u8>,
}

impl Write for UiLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for UiLogWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer)
            .trim_end()
            .to_string();
        // The UI task may already be gone during shutdown.
        if let Err(e) = self.sender.try_send(UiEvent::Log(line)) {
            if let UiEvent::Log(line) = e.into_inner() {
                eprintln!("{}", line);
            }
        }
    }
}

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

pub fn setup_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
    ui_sender: mpsc::Sender<UiEvent>,
) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(move || UiLogWriter {
            sender: ui_sender.clone(),
            buffer: Vec::new(),
        })
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!(e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use std::sync::Once;
    use std::thread;
    use std::time::Duration;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            let (sender, _receiver) = mpsc::channel(16);
            setup_logging(3, false, None, sender).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level_filters() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    fn log_writer_sends_one_event_per_record() {
        let (sender, mut receiver) = mpsc::channel(4);
        {
            let mut writer = UiLogWriter {
                sender,
                buffer: Vec::new(),
            };
            writer.write_all(b"WARN something happened\n").unwrap();
        }

        match receiver.try_recv() {
            Ok(UiEvent::Log(line)) => assert_eq!(line, "WARN something happened"),
            other => panic!("expected log event, got {:?}", other),
        }
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    #[serial]
    fn file_logging_can_be_added_to_global_logger() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(log_path.clone()).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!("Message for file-only test.");
        });

        thread::sleep(Duration::from_millis(100));

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Message for file-only test."));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let (sender, _receiver) = mpsc::channel(1);
            let result = setup_logging(0, false, Some(&invalid_path), sender);
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
