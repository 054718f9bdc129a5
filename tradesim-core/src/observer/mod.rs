//! Observer pattern for turn reports.
//!
//! Observers receive each [`TurnReport`] after the turn has been committed.
//! They only see read-only projections, so nothing they do can change the
//! simulation.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ObserverRegistry::new();
//! registry.register(Box::new(ConsoleObserver::stdout(&["VEN", "GEN"])));
//!
//! // In simulation loop, after step_turn:
//! registry.notify(&report);
//! ```

pub mod console;
pub mod json;

use crate::report::TurnReport;
use thiserror::Error;

/// Errors that can occur during observation.
#[derive(Error, Debug)]
pub enum ObserverError {
    /// I/O error (e.g., writing to terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error (e.g., JSON output)
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
}

/// Configuration for observer notification frequency.
#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Notify every N turns (1 = every turn)
    pub frequency: u32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { frequency: 1 }
    }
}

/// Trait for simulation observers.
///
/// Errors returned from `on_turn` are logged but do not block simulation.
pub trait SimObserver: Send + Sync {
    fn on_turn(&self, report: &TurnReport) -> Result<(), ObserverError>;

    /// Human-readable name for logging/debugging.
    fn name(&self) -> &str;

    fn config(&self) -> ObserverConfig {
        ObserverConfig::default()
    }

    /// Called when simulation ends or observer is unregistered.
    fn on_shutdown(&self) {}
}

/// Registry for managing multiple observers.
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SimObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self { observers: vec![] }
    }

    pub fn register(&mut self, observer: Box<dyn SimObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    /// Notify every observer whose frequency matches this turn.
    ///
    /// Errors are logged but do not propagate (non-blocking).
    pub fn notify(&self, report: &TurnReport) {
        for observer in &self.observers {
            let frequency = observer.config().frequency.max(1);
            if report.turn % frequency != 0 {
                continue;
            }
            if let Err(e) = observer.on_turn(report) {
                log::warn!("Observer '{}' error: {}", observer.name(), e);
            }
        }
    }

    pub fn shutdown(&self) {
        for observer in &self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        // Flush buffered sinks
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Shared counter for test observers
    #[derive(Clone)]
    struct SharedCounter(Arc<AtomicU64>);

    impl SharedCounter {
        fn new() -> Self {
            Self(Arc::new(AtomicU64::new(0)))
        }

        fn get(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }

        fn increment(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CountingObserver {
        counter: SharedCounter,
        config: ObserverConfig,
    }

    impl CountingObserver {
        fn new(counter: SharedCounter) -> Self {
            Self {
                counter,
                config: ObserverConfig::default(),
            }
        }

        fn with_frequency(mut self, frequency: u32) -> Self {
            self.config.frequency = frequency;
            self
        }
    }

    impl SimObserver for CountingObserver {
        fn on_turn(&self, _report: &TurnReport) -> Result<(), ObserverError> {
            self.counter.increment();
            Ok(())
        }

        fn name(&self) -> &str {
            "CountingObserver"
        }

        fn config(&self) -> ObserverConfig {
            self.config.clone()
        }
    }

    struct FailingObserver;

    impl SimObserver for FailingObserver {
        fn on_turn(&self, _report: &TurnReport) -> Result<(), ObserverError> {
            Err(ObserverError::Render("boom".to_string()))
        }

        fn name(&self) -> &str {
            "FailingObserver"
        }
    }

    fn report(turn: u32) -> TurnReport {
        TurnReport {
            turn,
            nodes: vec![],
            nations: BTreeMap::new(),
            rejected: vec![],
        }
    }

    #[test]
    fn test_observer_notification() {
        let counter = SharedCounter::new();
        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(CountingObserver::new(counter.clone())));

        registry.notify(&report(1));
        registry.notify(&report(2));

        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_frequency_filtering() {
        let counter = SharedCounter::new();
        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(
            CountingObserver::new(counter.clone()).with_frequency(5),
        ));

        for turn in 1..=10 {
            registry.notify(&report(turn));
        }

        // Turns 5 and 10
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_failing_observer_does_not_block_others() {
        let counter = SharedCounter::new();
        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(FailingObserver));
        registry.register(Box::new(CountingObserver::new(counter.clone())));

        registry.notify(&report(1));

        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_registry_len() {
        let counter = SharedCounter::new();
        let mut registry = ObserverRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(CountingObserver::new(counter.clone())));
        registry.register(Box::new(CountingObserver::new(counter)));
        assert_eq!(registry.len(), 2);
    }
}
