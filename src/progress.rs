// Download progress state for the UI, independent of link resolution
//
// Idle -> InProgress(0..=100) -> Complete -> Idle (reset)

use serde::{Deserialize, Serialize};

/// Increment used by the simulated ticker
pub const SIMULATED_STEP: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    Idle,
    InProgress(u8),
    Complete,
}

/// Progress payload sent to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}

#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Begin a download at 0%. Ignored while one is already running.
    pub fn start(&mut self) {
        if !matches!(self.state, ProgressState::InProgress(_)) {
            self.state = ProgressState::InProgress(0);
        }
    }

    /// Move to `percent`; values below the current one are ignored
    pub fn set(&mut self, percent: u8) -> ProgressState {
        if let ProgressState::InProgress(current) = self.state {
            let next = percent.clamp(current, 100);
            self.state = if next == 100 {
                ProgressState::Complete
            } else {
                ProgressState::InProgress(next)
            };
        }
        self.state
    }

    pub fn advance(&mut self, step: u8) -> ProgressState {
        match self.state {
            ProgressState::InProgress(current) => self.set(current.saturating_add(step)),
            other => other,
        }
    }

    /// One tick of the simulated ticker
    pub fn tick(&mut self) -> ProgressState {
        self.advance(SIMULATED_STEP)
    }

    pub fn reset(&mut self) {
        self.state = ProgressState::Idle;
    }

    pub fn snapshot(&self) -> Option<DownloadProgress> {
        match self.state {
            ProgressState::Idle => None,
            ProgressState::InProgress(p) => Some(DownloadProgress {
                percent: f32::from(p),
                status: "downloading".to_string(),
            }),
            ProgressState::Complete => Some(DownloadProgress {
                percent: 100.0,
                status: "complete".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_run() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.snapshot(), None);

        tracker.start();
        let mut seen = vec![0u8];
        while let ProgressState::InProgress(p) = tracker.tick() {
            assert!(p >= *seen.last().unwrap());
            seen.push(p);
        }
        assert_eq!(seen, [0, 20, 40, 60, 80]);
        assert_eq!(tracker.state(), ProgressState::Complete);
        assert_eq!(tracker.snapshot().unwrap().percent, 100.0);

        tracker.reset();
        assert_eq!(tracker.state(), ProgressState::Idle);
    }

    #[test]
    fn test_monotonic() {
        let mut tracker = ProgressTracker::new();
        tracker.start();
        tracker.set(60);
        assert_eq!(tracker.set(30), ProgressState::InProgress(60));
        assert_eq!(tracker.advance(200), ProgressState::Complete);
        assert_eq!(tracker.tick(), ProgressState::Complete);
    }

    #[test]
    fn test_idle_ignores_updates() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.set(50), ProgressState::Idle);
        assert_eq!(tracker.tick(), ProgressState::Idle);
    }
}
