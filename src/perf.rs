//! Lightweight timing scopes and an append-only edit log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EDIT_LOG: LazyLock<Mutex<EditLog>> = LazyLock::new(|| Mutex::new(EditLog::new()));

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.3} ms", self.name, elapsed_ms);
    }
}

#[derive(Debug)]
struct EditLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EditLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

fn edit_log() -> MutexGuard<'static, EditLog> {
    EDIT_LOG
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Start a timing scope that reports its duration on drop when enabled.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Append edit events to `path`, or stop logging when `None`.
pub fn set_edit_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = edit_log();
    if let Some(path) = path {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "textbuf edit log start")?;
        writer.flush()?;
        log.start = Instant::now();
        log.writer = Some(writer);
    } else {
        log.writer = None;
    }
    Ok(())
}

pub fn is_edit_log_enabled() -> bool {
    edit_log().writer.is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = edit_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_edit_log_path_enables_logging_and_appends() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "previous\n").unwrap();

        set_edit_log_path(Some(temp_file.path())).unwrap();
        assert!(is_edit_log_enabled());
        log_event("insert", "r1 at 0:5");
        set_edit_log_path(None).unwrap();
        assert!(!is_edit_log_enabled());
        log_event("dropped", "not written");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("previous\n"));
        assert!(content.contains("textbuf edit log start"));
        assert!(content.contains("insert: r1 at 0:5"));
        assert!(!content.contains("dropped"));
    }
}
