//! Console observer for terminal-based simulation monitoring.
//!
//! Prints one block per turn: each watched nation's treasury with its turn
//! delta, trade income and free merchants, followed by its warnings and the
//! trade nodes with their total value.

use super::{ObserverConfig, ObserverError, SimObserver};
use crate::fixed::Fixed;
use crate::report::TurnReport;
use std::io::{self, Write};
use std::sync::Mutex;

pub struct ConsoleObserver {
    /// Nations to print; empty means every nation in the report.
    nations: Vec<String>,
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
    show_nodes: bool,
    config: ObserverConfig,
}

impl ConsoleObserver {
    pub fn new(nations: &[&str], out: Box<dyn Write + Send>) -> Self {
        Self {
            nations: nations.iter().map(|s| s.to_string()).collect(),
            out: Mutex::new(out),
            color: false,
            show_nodes: true,
            config: ObserverConfig::default(),
        }
    }

    /// Colored output on stdout.
    pub fn stdout(nations: &[&str]) -> Self {
        Self::new(nations, Box::new(io::stdout())).with_color(true)
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_nodes(mut self, show_nodes: bool) -> Self {
        self.show_nodes = show_nodes;
        self
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.config.frequency = frequency;
        self
    }

    fn paint(&self, delta: Fixed) -> (&'static str, &'static str) {
        if self.color {
            (delta_color(delta), "\x1b[0m")
        } else {
            ("", "")
        }
    }
}

impl SimObserver for ConsoleObserver {
    fn on_turn(&self, report: &TurnReport) -> Result<(), ObserverError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ObserverError::Render("Lock poisoned".to_string()))?;

        writeln!(out, "Turn {}", report.turn)?;

        for (id, nation) in &report.nations {
            if !self.nations.is_empty() && !self.nations.contains(id) {
                continue;
            }
            let treasury = &nation.balances.treasury;
            let (start, reset) = self.paint(treasury.net);
            writeln!(
                out,
                " {}: treasury {:>9} ({}{:+.2}{}) trade {:>7} merchants free {}",
                id,
                treasury.reserves.to_string(),
                start,
                treasury.net.to_f64(),
                reset,
                nation.trade_income.to_string(),
                nation.free_merchants
            )?;
            for warning in &nation.warnings {
                writeln!(out, "   ! {}", warning)?;
            }
            for (kind, delta) in nation.effects.iter() {
                writeln!(out, "   {} {:+.2}", kind, delta.to_f64())?;
            }
        }

        if self.show_nodes {
            for node in &report.nodes {
                writeln!(
                    out,
                    " [{}] total {} unclaimed {}",
                    node.name, node.total_value, node.unclaimed
                )?;
            }
        }

        for rejected in &report.rejected {
            writeln!(out, " rejected {}: {}", rejected.nation, rejected.reason)?;
        }

        out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "ConsoleObserver"
    }

    fn config(&self) -> ObserverConfig {
        self.config.clone()
    }
}

/// Returns ANSI color code based on delta sign.
fn delta_color(delta: Fixed) -> &'static str {
    if delta.is_positive() {
        "\x1b[32m" // Green for gains
    } else if delta.is_negative() {
        "\x1b[31m" // Red for losses
    } else {
        "\x1b[90m" // Gray for no change
    }
}
