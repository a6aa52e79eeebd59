use crate::error::{ChartError, ChartResult};

/// Sentinel stored for absent or invalid samples.
pub const MISSING: f64 = f64::NAN;

/// Maps raw input to a storable sample: `None`, NaN and infinities become
/// [`MISSING`].
#[must_use]
pub fn sanitize_sample(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => MISSING,
    }
}

#[must_use]
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}

/// Fixed-capacity ring buffer holding one series' recent samples.
///
/// Pushes are O(1): the write cursor wraps around the storage and the oldest
/// logical sample is overwritten once the buffer is full. Running sum and
/// sum-of-squares are kept over the valid (non-missing) entries, together
/// with their count, so mean and deviation never need a scan.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    storage: Vec<f64>,
    cursor: usize,
    count: usize,
    valid: usize,
    running_sum: f64,
    running_sq_sum: f64,
}

impl SeriesBuffer {
    pub fn new(capacity: usize) -> ChartResult<Self> {
        if capacity == 0 {
            return Err(ChartError::InvalidConfig(
                "series buffer capacity must be > 0".to_owned(),
            ));
        }

        Ok(Self {
            storage: vec![MISSING; capacity],
            cursor: 0,
            count: 0,
            valid: 0,
            running_sum: 0.0,
            running_sq_sum: 0.0,
        })
    }

    /// Appends one sample, evicting the oldest one when full.
    pub fn push(&mut self, value: Option<f64>) {
        let clean = sanitize_sample(value);
        let capacity = self.storage.len();

        if self.count == capacity {
            let evicted = self.storage[self.cursor];
            if !is_missing(evicted) {
                self.running_sum -= evicted;
                self.running_sq_sum -= evicted * evicted;
                self.valid -= 1;
            }
        }

        self.storage[self.cursor] = clean;
        self.cursor = (self.cursor + 1) % capacity;
        self.count = (self.count + 1).min(capacity);

        if !is_missing(clean) {
            self.running_sum += clean;
            self.running_sq_sum += clean * clean;
            self.valid += 1;
        }
    }

    /// Convenience for callers holding a plain `f64`.
    pub fn push_value(&mut self, value: f64) {
        self.push(Some(value));
    }

    /// Independent copy of the logical contents, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Iterates the logical contents, oldest first, without allocating.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let start = self.oldest_index();
        let capacity = self.storage.len();
        (0..self.count).map(move |offset| self.storage[(start + offset) % capacity])
    }

    /// Newest sample, or [`MISSING`] when nothing was pushed yet.
    #[must_use]
    pub fn latest(&self) -> f64 {
        if self.count == 0 {
            return MISSING;
        }
        let capacity = self.storage.len();
        self.storage[(self.cursor + capacity - 1) % capacity]
    }

    /// `(min, max)` over valid samples; `None` when there are none.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.storage[..self.filled_len()]
            .iter()
            .copied()
            .filter(|value| !is_missing(*value))
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }

    pub fn clear(&mut self) {
        self.storage.fill(MISSING);
        self.cursor = 0;
        self.count = 0;
        self.valid = 0;
        self.running_sum = 0.0;
        self.running_sq_sum = 0.0;
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of stored samples (missing ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.storage.len()
    }

    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid
    }

    #[must_use]
    pub fn running_sum(&self) -> f64 {
        self.running_sum
    }

    #[must_use]
    pub fn running_sq_sum(&self) -> f64 {
        self.running_sq_sum
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        let valid = self.valid_count();
        (valid > 0).then(|| self.running_sum / valid as f64)
    }

    /// Population standard deviation derived from the running sums.
    #[must_use]
    pub fn std_dev(&self) -> Option<f64> {
        let valid = self.valid_count();
        if valid == 0 {
            return None;
        }
        let n = valid as f64;
        let mean = self.running_sum / n;
        // Cancellation in the running sums can dip slightly below zero.
        let variance = (self.running_sq_sum / n - mean * mean).max(0.0);
        Some(variance.sqrt())
    }

    fn oldest_index(&self) -> usize {
        if self.count < self.storage.len() {
            0
        } else {
            self.cursor
        }
    }

    // Until the first wrap only the prefix holds written slots.
    fn filled_len(&self) -> usize {
        if self.count < self.storage.len() {
            self.count
        } else {
            self.storage.len()
        }
    }
}
