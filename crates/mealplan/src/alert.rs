use std::sync::Arc;

/// Sink for one-shot user-facing alerts.
pub trait Alert: Send + Sync {
    fn show(&self, title: &str, message: &str);
}

impl<T: Alert + ?Sized> Alert for Arc<T> {
    fn show(&self, title: &str, message: &str) {
        (**self).show(title, message)
    }
}

/// Alerts written to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlert;

impl Alert for TracingAlert {
    fn show(&self, title: &str, message: &str) {
        tracing::warn!(title, message, "alert");
    }
}
