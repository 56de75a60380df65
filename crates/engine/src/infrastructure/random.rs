//! Random implementations.

use rand::Rng;

use crate::infrastructure::ports::RandomPort;

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Fixed random for testing. Integer draws are clamped into the requested range.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            min
        } else {
            self.0.clamp(min, max)
        }
    }

    fn gen_unit(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..200 {
            let value = random.gen_range(60, 119);
            assert!((60..=119).contains(&value));
            let unit = random.gen_unit();
            assert!((0.0..1.0).contains(&unit));
        }
    }

    #[test]
    fn empty_range_returns_min() {
        assert_eq!(SystemRandom::new().gen_range(5, 5), 5);
        assert_eq!(SystemRandom::new().gen_range(5, 2), 5);
        assert_eq!(FixedRandom(9).gen_range(0, -1), 0);
    }

    #[test]
    fn fixed_random_clamps() {
        let random = FixedRandom(500);
        assert_eq!(random.gen_range(0, 99), 99);
        assert_eq!(random.gen_range(600, 700), 600);
    }
}
