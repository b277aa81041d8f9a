//! Import progress reporting.
//!
//! Reports observable progress during `rec import` so users see which file
//! is being read and how many rows have been written. Progress is emitted
//! on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for import.
#[derive(Clone, Debug)]
pub enum ImportProgressEvent {
    /// A CSV file is being parsed. Total unknown.
    Reading { file: String },
    /// Rows are being upserted: n written out of total.
    Writing { table: String, n: u64, total: u64 },
}

/// Reports import progress. Implementations write to stderr (human or JSON).
pub trait ImportProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the import pipeline.
    fn report(&self, event: ImportProgressEvent);
}

/// Human-friendly progress on stderr: "import ratings  writing  1,234 / 5,000 rows".
pub struct StderrProgress;

impl ImportProgressReporter for StderrProgress {
    fn report(&self, event: ImportProgressEvent) {
        let _ = std::io::stderr()
            .lock()
            .write_all(human_line(&event).as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

fn human_line(event: &ImportProgressEvent) -> String {
    match event {
        ImportProgressEvent::Reading { file } => format!("import  reading {}...\n", file),
        ImportProgressEvent::Writing { table, n, total } => format!(
            "import {}  writing  {} / {} rows\n",
            table,
            format_number(*n),
            format_number(*total)
        ),
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ImportProgressReporter for JsonProgress {
    fn report(&self, event: ImportProgressEvent) {
        let obj = match &event {
            ImportProgressEvent::Reading { file } => serde_json::json!({
                "event": "progress",
                "phase": "reading",
                "file": file
            }),
            ImportProgressEvent::Writing { table, n, total } => serde_json::json!({
                "event": "progress",
                "phase": "writing",
                "table": table,
                "n": n,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ImportProgressReporter for NoProgress {
    fn report(&self, _event: ImportProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. Caller can pass it to import.
    pub fn reporter(&self) -> Box<dyn ImportProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
