use std::time::Duration;

/// m/s², as reported by accelerometers at rest.
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Acceleration beyond gravity (m/s²) that counts as a shake.
pub const SHAKE_THRESHOLD: f64 = 12.0;

pub const MIN_TRIGGER_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerometerSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// time of the reading, relative to an arbitrary but fixed origin
    pub timestamp: Duration,
}

impl AccelerometerSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: Duration) -> Self {
        Self { x, y, z, timestamp }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: f64,
    min_interval: Duration,
    last_trigger: Option<Duration>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(SHAKE_THRESHOLD, MIN_TRIGGER_INTERVAL)
    }
}

impl ShakeDetector {
    pub fn new(threshold: f64, min_interval: Duration) -> Self {
        Self {
            threshold,
            min_interval,
            last_trigger: None,
        }
    }

    /// Returns true if the sample is a shake. Shakes closer together than the
    /// minimum interval are dropped.
    pub fn on_sample(&mut self, sample: &AccelerometerSample) -> bool {
        let acceleration = sample.magnitude() - STANDARD_GRAVITY;
        if acceleration <= self.threshold {
            return false;
        }

        if let Some(last) = self.last_trigger {
            if sample.timestamp.saturating_sub(last) < self.min_interval {
                return false;
            }
        }

        log::debug!("shake detected ({acceleration:.2} m/s² above gravity)");
        self.last_trigger = Some(sample.timestamp);
        true
    }
}
