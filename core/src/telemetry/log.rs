use log::{info, warn};

/// Thin logging facade tagging records with the owning subsystem.
pub struct LogManager {
    subsystem: &'static str,
}

impl LogManager {
    pub fn new(subsystem: &'static str) -> Self {
        Self { subsystem }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.subsystem, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.subsystem, message);
    }
}
