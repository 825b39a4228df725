use std::sync::Arc;

use lineup_service::{AvailabilityWindow, QueueService};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueueService>,
    /// Fixed per-appointment duration for the spot calculation.
    pub appointment_duration_secs: u32,
    /// Clinic opening windows, parsed once at startup.
    pub windows: Arc<Vec<AvailabilityWindow>>,
}

impl AppState {
    pub fn new(
        service: Arc<QueueService>,
        appointment_duration_secs: u32,
        windows: Vec<AvailabilityWindow>,
    ) -> Self {
        Self {
            service,
            appointment_duration_secs,
            windows: Arc::new(windows),
        }
    }
}
