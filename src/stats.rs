use crate::reading::{LedState, Reading};

/// Derived statistics over the current snapshot.
///
/// Recomputed from scratch on every render; the snapshot is small enough
/// that a single pass per frame is cheaper than keeping incremental state
/// correct across wholesale replacements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotStats {
    /// Number of readings in the snapshot.
    pub count: usize,
    /// Arithmetic mean of the values, 0.0 for an empty snapshot.
    pub average: f64,
    /// Largest value, 0.0 for an empty snapshot.
    pub max: f64,
    /// Smallest value, 0.0 for an empty snapshot.
    pub min: f64,
    /// Readings at or above the threshold.
    pub led_on: usize,
    /// Readings below the threshold.
    pub led_off: usize,
}

impl SnapshotStats {
    /// Computes statistics in a single fold over the snapshot.
    pub fn compute(snapshot: &[Reading], threshold: f64) -> Self {
        if snapshot.is_empty() {
            return Self {
                count: 0,
                average: 0.0,
                max: 0.0,
                min: 0.0,
                led_on: 0,
                led_off: 0,
            };
        }

        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut led_on = 0;

        for reading in snapshot {
            sum += reading.value;
            max = max.max(reading.value);
            min = min.min(reading.value);
            if LedState::classify(reading.value, threshold) == LedState::On {
                led_on += 1;
            }
        }

        Self {
            count: snapshot.len(),
            average: sum / snapshot.len() as f64,
            max,
            min,
            led_on,
            led_off: snapshot.len() - led_on,
        }
    }

    /// Average formatted to two decimal places, as shown in the stats panel.
    pub fn average_display(&self) -> String {
        format!("{:.2}", self.average)
    }

    /// Fraction of readings classified On, in 0.0..=1.0. Zero for an empty
    /// snapshot so the pie chart degrades to a single sector.
    pub fn on_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.led_on as f64 / self.count as f64
        }
    }
}
