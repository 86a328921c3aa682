use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Default number of intermediate reports emitted over a whole run.
const DEFAULT_REPORTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Completed fraction in `[0, 1]`.
    pub fraction: f64,
    pub elapsed: Duration,
}

impl ProgressReport {
    /// Linear estimate of the remaining time. `None` before any progress.
    pub fn eta(&self) -> Option<Duration> {
        if self.fraction <= 0.0 {
            return None;
        }
        let remaining = self.elapsed.as_secs_f64() / self.fraction * (1.0 - self.fraction);
        Some(Duration::from_secs_f64(remaining.max(0.0)))
    }
}

/// Receives progress reports, possibly from several worker threads at once.
pub trait ProgressObserver: Sync {
    fn report(&self, report: ProgressReport);
}

impl<F> ProgressObserver for F
where
    F: Fn(ProgressReport) + Sync,
{
    fn report(&self, report: ProgressReport) {
        self(report)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&self, _report: ProgressReport) {}
}

/// Shared completion counter for one run.
///
/// Each unit of work calls [`ProgressTracker::advance`] once. The observer is
/// invoked whenever the counter crosses a report boundary and once more when
/// the run completes; reports from different threads may arrive out of order.
pub struct ProgressTracker<'a, O: ?Sized> {
    observer: &'a O,
    total: usize,
    every: usize,
    done: AtomicUsize,
    start: Instant,
}

impl<'a, O: ProgressObserver + ?Sized> ProgressTracker<'a, O> {
    pub fn new(observer: &'a O, total: usize) -> Self {
        Self::with_report_count(observer, total, DEFAULT_REPORTS)
    }

    pub fn with_report_count(observer: &'a O, total: usize, reports: usize) -> Self {
        let every = total.div_ceil(reports.max(1)).max(1);
        Self {
            observer,
            total,
            every,
            done: AtomicUsize::new(0),
            start: Instant::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn advance(&self, units: usize) {
        if units == 0 {
            return;
        }
        let before = self.done.fetch_add(units, Ordering::Relaxed);
        let now = before + units;

        let crossed = now / self.every != before / self.every;
        let finished = before < self.total && now >= self.total;
        if crossed || finished {
            self.observer.report(self.snapshot(now));
        }
    }

    fn snapshot(&self, done: usize) -> ProgressReport {
        let fraction = if self.total == 0 {
            1.0
        } else {
            (done as f64 / self.total as f64).min(1.0)
        };
        ProgressReport {
            fraction,
            elapsed: self.start.elapsed(),
        }
    }
}
