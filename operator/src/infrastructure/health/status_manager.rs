use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock},
};

use tracing::{info, warn};

use crate::domain::health::{
    entities::{DegradedReason, HealthSignal, StatusComponent},
    ports::HealthReporter,
};

/// In-process record of the last health signal of each component.
#[derive(Debug, Default)]
pub struct StatusManager {
    signals: RwLock<BTreeMap<StatusComponent, HealthSignal>>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, component: StatusComponent) -> Option<HealthSignal> {
        self.signals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&component)
            .cloned()
    }

    pub fn is_degraded(&self) -> bool {
        self.signals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .any(|signal| signal.degraded)
    }

    /// Stores `signal` and returns the one it replaced.
    fn record(&self, signal: HealthSignal) -> Option<HealthSignal> {
        self.signals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(signal.component, signal)
    }
}

impl HealthReporter for StatusManager {
    fn set_degraded(&self, component: StatusComponent, reason: DegradedReason, message: String) {
        let signal = HealthSignal::degraded(component, reason, message);
        let previous = self.record(signal.clone());

        if previous.as_ref() != Some(&signal) {
            warn!(
                component = %component,
                reason = %reason,
                "{} is degraded: {}",
                component,
                signal.message.as_deref().unwrap_or_default()
            );
        }
    }

    fn set_not_degraded(&self, component: StatusComponent) {
        let previous = self.record(HealthSignal::healthy(component));

        if previous.is_some_and(|signal| signal.degraded) {
            info!(component = %component, "{} is no longer degraded", component);
        }
    }
}
