//! src/sampler.rs
//! Uniform sampling without replacement.
//!
//! The random source is a parameter so callers decide between a seeded
//! `ChaCha20Rng` (reproducible runs, tests) and OS entropy.

use rand::Rng;

/// Pick `min(count, candidates.len())` distinct candidates uniformly at random.
///
/// When `count` covers every candidate the input is returned untouched, in
/// its original order. Otherwise the first `count` slots are filled by a
/// partial Fisher–Yates shuffle; the output order carries no relation to the
/// input order.
pub fn select_random<T, R>(mut candidates: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let len = candidates.len();
    if count >= len {
        return candidates;
    }

    // === Partial Fisher–Yates: slot i draws uniformly from the unpicked tail ===
    for i in 0..count {
        let j = rng.random_range(i..len);
        candidates.swap(i, j);
    }
    candidates.truncate(count);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn count_at_or_above_len_returns_everything_in_order() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(select_random(items.clone(), 5, &mut rng), items);
        assert_eq!(select_random(items.clone(), 50, &mut rng), items);
    }

    #[test]
    fn zero_count_returns_nothing() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(select_random(vec![1, 2, 3], 0, &mut rng).is_empty());
        assert!(select_random(Vec::<u8>::new(), 0, &mut rng).is_empty());
    }

    #[test]
    fn returns_exactly_count_distinct_candidates() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let items: Vec<u32> = (0..100).collect();
        let picked = select_random(items, 10, &mut rng);
        assert_eq!(picked.len(), 10);
        let unique: HashSet<_> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(picked.iter().all(|v| *v < 100));
    }

    #[test]
    fn same_seed_same_selection() {
        let items: Vec<u32> = (0..50).collect();
        let a = select_random(items.clone(), 5, &mut ChaCha20Rng::seed_from_u64(42));
        let b = select_random(items.clone(), 5, &mut ChaCha20Rng::seed_from_u64(42));
        let c = select_random(items, 5, &mut ChaCha20Rng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn selection_frequency_is_roughly_uniform() {
        const TRIALS: usize = 20_000;
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let mut hits = [0usize; 10];
        for _ in 0..TRIALS {
            for v in select_random((0..10).collect::<Vec<usize>>(), 3, &mut rng) {
                hits[v] += 1;
            }
        }
        // Expected 6000 per element; sigma is about 65.
        for (i, h) in hits.iter().enumerate() {
            assert!((5400..=6600).contains(h), "element {i} picked {h} times");
        }
    }
}
