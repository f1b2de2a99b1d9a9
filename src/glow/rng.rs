//! Random draws for the events engine.

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// 64-bit LCG (Knuth's MMIX constants). Deterministic for a given seed.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits → exact f64 mantissa.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws, then repeats the last one.
#[cfg(test)]
pub struct Scripted {
    draws: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        let v = self
            .draws
            .get(self.pos)
            .or(self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn scripted_repeats_last() {
        let mut s = Scripted::new(&[0.1, 0.9]);
        assert_eq!(s.next_f64(), 0.1);
        assert_eq!(s.next_f64(), 0.9);
        assert_eq!(s.next_f64(), 0.9);
    }

    #[test]
    fn lcg_mean_is_near_half() {
        let mut rng = Lcg::new(42);
        let n = 10_000;
        let mean: f64 = (0..n).map(|_| rng.next_f64()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {}", mean);
    }

    proptest! {
        #[test]
        fn prop_lcg_in_unit_interval(seed in any::<u64>()) {
            let mut rng = Lcg::new(seed);
            for _ in 0..50 {
                let v = rng.next_f64();
                prop_assert!((0.0..1.0).contains(&v), "got {}", v);
            }
        }
    }
}
