//! Turn reports as JSON lines.
//!
//! One [`TurnReport`] per line, written to any `Write` destination (file,
//! pipe, stdout). Numbers are plain decimals.

use super::{ObserverConfig, ObserverError, SimObserver};
use crate::report::TurnReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

pub struct JsonLinesObserver {
    out: Mutex<Box<dyn Write + Send>>,
    config: ObserverConfig,
}

impl JsonLinesObserver {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            config: ObserverConfig::default(),
        }
    }

    /// Create (or truncate) `path` and write reports to it.
    pub fn create(path: &Path) -> Result<Self, ObserverError> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }
}

impl SimObserver for JsonLinesObserver {
    fn on_turn(&self, report: &TurnReport) -> Result<(), ObserverError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ObserverError::Render("Lock poisoned".to_string()))?;
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "JsonLinesObserver"
    }

    fn config(&self) -> ObserverConfig {
        self.config.clone()
    }

    fn on_shutdown(&self) {
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = out.flush() {
                log::warn!("Failed to flush JSON report: {}", e);
            }
        }
    }
}
