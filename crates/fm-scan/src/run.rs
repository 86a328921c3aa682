/// Scan state of one pixel column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Counting a run that has not reached the threshold yet.
    Searching { run: usize },
    /// Inside a run long enough to count as hole number `hole`.
    InRun { run: usize, hole: usize },
}

/// Emitted for every pixel that extends a qualifying run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunUpdate {
    /// Index of the hole within this pixel column, in encounter order.
    pub hole: usize,
    /// Current run length in pixels.
    pub run: usize,
}

/// Vertical run-length state machine for a single pixel column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTracker {
    threshold: usize,
    state: RunState,
    holes: usize,
}

impl RunTracker {
    /// `threshold` is the run length at which a run becomes a hole.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is zero. [`FoilGeometry::detection_threshold_px`]
    /// never returns zero.
    ///
    /// [`FoilGeometry::detection_threshold_px`]: fm_core::FoilGeometry::detection_threshold_px
    pub fn new(threshold: usize) -> Self {
        assert!(threshold >= 1, "detection threshold must be at least one pixel");
        Self {
            threshold,
            state: RunState::Searching { run: 0 },
            holes: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of holes opened so far.
    pub fn holes(&self) -> usize {
        self.holes
    }

    #[inline]
    pub fn push(&mut self, is_hole: bool) -> Option<RunUpdate> {
        if !is_hole {
            self.state = RunState::Searching { run: 0 };
            return None;
        }

        match self.state {
            RunState::Searching { run } => {
                let run = run + 1;
                if run < self.threshold {
                    self.state = RunState::Searching { run };
                    return None;
                }
                let hole = self.holes;
                self.holes += 1;
                self.state = RunState::InRun { run, hole };
                Some(RunUpdate { hole, run })
            }
            RunState::InRun { run, hole } => {
                let run = run + 1;
                self.state = RunState::InRun { run, hole };
                Some(RunUpdate { hole, run })
            }
        }
    }
}
