use std::sync::Arc;

use crate::domain::health::entities::{DegradedReason, StatusComponent};

/// Write-only health side channel. Both calls are fire-and-forget and the
/// last write per component wins.
#[cfg_attr(test, mockall::automock)]
pub trait HealthReporter: Send + Sync {
    fn set_degraded(&self, component: StatusComponent, reason: DegradedReason, message: String);
    fn set_not_degraded(&self, component: StatusComponent);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn set_degraded(&self, component: StatusComponent, reason: DegradedReason, message: String) {
        (**self).set_degraded(component, reason, message)
    }

    fn set_not_degraded(&self, component: StatusComponent) {
        (**self).set_not_degraded(component)
    }
}
