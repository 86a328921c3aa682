use fm_core::{ProgressObserver, ProgressReport};

/// Logs progress of one processing stage through `tracing`.
///
/// Every tenth percent goes to `info`, the rest to `debug`.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    stage: &'static str,
}

impl LogProgress {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }
}

impl ProgressObserver for LogProgress {
    fn report(&self, report: ProgressReport) {
        let percent = (report.fraction * 100.0).round() as u32;
        let eta = report
            .eta()
            .map_or_else(|| "?".to_owned(), |d| format!("{:.1}s", d.as_secs_f64()));
        let elapsed = report.elapsed.as_secs_f64();
        if percent % 10 == 0 {
            tracing::info!("{}: {percent}% ({elapsed:.1}s elapsed, eta {eta})", self.stage);
        } else {
            tracing::debug!("{}: {percent}% ({elapsed:.1}s elapsed, eta {eta})", self.stage);
        }
    }
}
