//! Generic weighted choice over caller-supplied `(item, weight)` pairs.
//!
//! The domain never draws randomness itself; `choose` takes a uniform roll in
//! `[0, 1)` produced by the caller.

/// A weighted table of candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedChoice<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedChoice<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: 0.0,
        }
    }

    /// Add a candidate. Non-positive or non-finite weights are ignored.
    pub fn add(&mut self, item: T, weight: f64) {
        if weight.is_finite() && weight > 0.0 {
            self.total += weight;
            self.entries.push((item, weight));
        }
    }

    pub fn with(mut self, item: T, weight: f64) -> Self {
        self.add(item, weight);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pick a candidate for a uniform `roll` in `[0, 1)`.
    ///
    /// Rolls outside the range are clamped. Returns `None` only when empty.
    pub fn choose(&self, roll: f64) -> Option<&T> {
        let target = roll.clamp(0.0, 1.0) * self.total;
        let mut cumulative = 0.0;
        for (item, weight) in &self.entries {
            cumulative += weight;
            if target < cumulative {
                return Some(item);
            }
        }
        // roll == 1.0 or float drift on the last bucket
        self.entries.last().map(|(item, _)| item)
    }
}

impl<T> Default for WeightedChoice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(T, f64)> for WeightedChoice<T> {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let mut choice = Self::new();
        for (item, weight) in iter {
            choice.add(item, weight);
        }
        choice
    }
}
