//! Sampled trajectory with exact-time lookup.
//!
//! Owned by the solver; kernels hold it through `Arc` and only read it.

use mct_types::error::{MctError, MctResult};
use std::collections::HashMap;

/// Bit-pattern key; -0.0 and 0.0 map to the same key.
fn time_key(t: f64) -> u64 {
    if t == 0.0 {
        0.0f64.to_bits()
    } else {
        t.to_bits()
    }
}

#[derive(Debug, Clone)]
pub struct Trajectory<T> {
    times: Vec<f64>,
    snapshots: Vec<T>,
    index: HashMap<u64, usize>,
}

impl<T> Default for Trajectory<T> {
    fn default() -> Self {
        Trajectory {
            times: Vec::new(),
            snapshots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Trajectory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(times: Vec<f64>, snapshots: Vec<T>) -> MctResult<Self> {
        if times.len() != snapshots.len() {
            return Err(MctError::ShapeMismatch {
                what: "trajectory samples".to_string(),
                expected: format!("{} snapshots", times.len()),
                got: format!("{} snapshots", snapshots.len()),
            });
        }
        let mut trajectory = Trajectory {
            times: Vec::with_capacity(times.len()),
            snapshots: Vec::with_capacity(times.len()),
            index: HashMap::with_capacity(times.len()),
        };
        for (t, snapshot) in times.into_iter().zip(snapshots) {
            trajectory.push(t, snapshot)?;
        }
        Ok(trajectory)
    }

    /// Record one sample. Times must be finite and unique.
    pub fn push(&mut self, t: f64, snapshot: T) -> MctResult<()> {
        if !t.is_finite() {
            return Err(MctError::ConfigError(format!(
                "trajectory time must be finite, got {t}"
            )));
        }
        let key = time_key(t);
        if self.index.contains_key(&key) {
            return Err(MctError::ConfigError(format!(
                "trajectory already has a sample at t={t}"
            )));
        }
        self.index.insert(key, self.snapshots.len());
        self.times.push(t);
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Snapshot recorded at exactly `t`.
    pub fn snapshot(&self, t: f64) -> MctResult<&T> {
        match self.index.get(&time_key(t)) {
            Some(&i) => Ok(&self.snapshots[i]),
            None => {
                log::warn!("trajectory lookup at unsampled time t={t}");
                Err(MctError::TimeNotSampled { t })
            }
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        self.index.contains_key(&time_key(t))
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
