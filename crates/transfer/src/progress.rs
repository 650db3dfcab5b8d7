use std::time::{Duration, Instant};

use fodupload_protocol::constants::PROGRESS_FRAGMENT_INTERVAL;

use crate::types::UploadProgress;

/// Callback invoked with upload progress.
pub type ProgressCallback = Box<dyn Fn(&UploadProgress) + Send + Sync>;

// ---------------------------------------------------------------------------
// ProgressReporter
// ---------------------------------------------------------------------------

/// Notifies callbacks every N dispatched fragments.
pub struct ProgressReporter {
    interval: u64,
    callbacks: Vec<ProgressCallback>,
    speed: SpeedCalculator,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProgressReporter {
    /// Creates a reporter firing every `interval` fragments.
    ///
    /// If `interval` is `None` or zero, defaults to every 5 fragments.
    pub fn new(interval: Option<u64>) -> Self {
        let interval = match interval {
            Some(n) if n > 0 => n,
            _ => PROGRESS_FRAGMENT_INTERVAL,
        };
        Self {
            interval,
            callbacks: Vec::new(),
            speed: SpeedCalculator::new(None, None),
        }
    }

    /// Registers a progress callback.
    pub fn on_progress(&mut self, callback: ProgressCallback) {
        self.callbacks.push(callback);
    }

    /// Records `bytes` confirmed by the server.
    pub fn add_confirmed(&mut self, bytes: u64) {
        self.speed.add_sample(bytes);
    }

    /// Called after each dispatch. Returns the snapshot when a notification
    /// was due, so the caller can log it.
    pub fn fragment_dispatched(
        &self,
        fragments_sent: u64,
        bytes_sent: u64,
        total_bytes: Option<u64>,
    ) -> Option<UploadProgress> {
        if fragments_sent == 0 || fragments_sent % self.interval != 0 {
            return None;
        }
        let progress = UploadProgress {
            fragments_sent,
            bytes_sent,
            total_bytes,
            bytes_per_second: self.speed.bytes_per_second(),
        };
        for cb in &self.callbacks {
            cb(&progress);
        }
        Some(progress)
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }
}

// ---------------------------------------------------------------------------
// SpeedCalculator
// ---------------------------------------------------------------------------

struct SpeedSample {
    bytes: u64,
    timestamp: Instant,
}

/// Calculates transfer speed using a sliding window of samples.
pub struct SpeedCalculator {
    samples: Vec<SpeedSample>,
    max_samples: usize,
    window_size: Duration,
}

impl SpeedCalculator {
    /// Creates a new calculator.
    ///
    /// - `window_size`: time window for speed calculation (default 30 s).
    /// - `max_samples`: maximum retained samples (default 100).
    pub fn new(window_size: Option<Duration>, max_samples: Option<usize>) -> Self {
        Self {
            samples: Vec::new(),
            max_samples: max_samples.unwrap_or(100),
            window_size: window_size.unwrap_or(Duration::from_secs(30)),
        }
    }

    /// Records a sample of `bytes` transferred at the current instant.
    pub fn add_sample(&mut self, bytes: u64) {
        let now = Instant::now();
        self.samples.push(SpeedSample {
            bytes,
            timestamp: now,
        });

        // Prune samples outside the window.
        if let Some(cutoff) = now.checked_sub(self.window_size) {
            self.samples.retain(|sample| sample.timestamp >= cutoff);
        }

        if self.samples.len() > self.max_samples {
            let excess = self.samples.len() - self.max_samples;
            self.samples.drain(..excess);
        }
    }

    /// Returns the average speed in bytes/second within the window.
    ///
    /// Returns 0.0 if fewer than 2 samples.
    pub fn bytes_per_second(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }

        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];
        let elapsed = last.timestamp.duration_since(first.timestamp);
        if elapsed.is_zero() {
            return 0.0;
        }

        let total_bytes: u64 = self.samples.iter().map(|sample| sample.bytes).sum();
        total_bytes as f64 / elapsed.as_secs_f64()
    }
}
