// ─── Progress Reporting ───

/// Pipeline stage a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Downloading,
    Extracting,
    Launching,
}

/// Sink for discrete "N of total" progress events and status lines.
/// Implementations bridge to whatever foreground the embedder runs.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, stage: Stage, completed: usize, total: usize);

    fn on_status(&self, _message: &str) {}
}

/// Sink that discards everything; useful for tests and batch callers.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _stage: Stage, _completed: usize, _total: usize) {}
}

/// Throttles progress emission to at most one event per integer-percent
/// advance, so large batches do not flood the foreground.
#[derive(Debug)]
pub struct PercentThrottle {
    total: usize,
    last_percent: i32,
}

impl PercentThrottle {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            last_percent: -1,
        }
    }

    /// Returns true when `completed` crosses a new integer percent.
    pub fn admit(&mut self, completed: usize) -> bool {
        if self.total == 0 {
            return false;
        }
        let percent = (completed * 100 / self.total) as i32;
        if percent > self.last_percent {
            self.last_percent = percent;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_once_per_percent() {
        let mut throttle = PercentThrottle::new(1000);
        let admitted = (1..=1000).filter(|&n| throttle.admit(n)).count();
        // 0% through 100% inclusive.
        assert_eq!(admitted, 101);
    }

    #[test]
    fn small_batches_admit_every_completion() {
        let mut throttle = PercentThrottle::new(3);
        assert!(throttle.admit(1));
        assert!(throttle.admit(2));
        assert!(throttle.admit(3));
    }

    #[test]
    fn empty_batch_admits_nothing() {
        let mut throttle = PercentThrottle::new(0);
        assert!(!throttle.admit(0));
    }
}
