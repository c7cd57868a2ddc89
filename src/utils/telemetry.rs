// file: src/utils/telemetry.rs
// description: operation timing for the migration passes

use std::time::{Duration, Instant};
use tracing::info;

/// Operation timer for performance tracking
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with_count(self, count: usize, unit: &str) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} {} in {:.2}s",
            self.operation,
            count,
            unit,
            elapsed.as_secs_f64()
        );
        elapsed
    }
}
