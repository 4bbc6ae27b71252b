use crate::env::RngOracle;

/// Sampling without replacement that refills itself once drained.
///
/// Every item of the full set is picked exactly once per epoch; the next
/// epoch starts only after the remaining list is empty.
#[derive(Clone, Debug, Default)]
pub struct ExclusionPool<T> {
    full: Vec<T>,
    left: Vec<T>,
}

impl<T: Clone> ExclusionPool<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            left: items.clone(),
            full: items,
        }
    }

    /// Uniformly picks one remaining item. `None` only when the full set is empty.
    pub fn pick(&mut self, rng: &mut dyn RngOracle) -> Option<T> {
        if self.full.is_empty() {
            return None;
        }
        if self.left.is_empty() {
            self.left = self.full.clone();
        }
        let len = u32::try_from(self.left.len()).unwrap_or(u32::MAX);
        let index = rng.below(len) as usize;
        Some(self.left.swap_remove(index))
    }

    /// Replaces the full set and starts a fresh epoch.
    pub fn reset(&mut self, items: Vec<T>) {
        self.left = items.clone();
        self.full = items;
    }

    pub fn items(&self) -> &[T] {
        &self.full
    }

    pub fn remaining(&self) -> &[T] {
        &self.left
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::env::PcgRng;

    #[test]
    fn empty_pool_yields_nothing() {
        let mut pool: ExclusionPool<u8> = ExclusionPool::new(Vec::new());
        let mut rng = PcgRng::seeded(3);
        assert_eq!(pool.pick(&mut rng), None);
    }

    proptest! {
        #[test]
        fn no_repeats_within_an_epoch(size in 1usize..24, epochs in 1usize..4, seed: u64) {
            let mut pool = ExclusionPool::new((0..size).collect::<Vec<_>>());
            let mut rng = PcgRng::seeded(seed);

            for _ in 0..epochs {
                let mut seen = HashSet::new();
                for _ in 0..size {
                    let item = pool.pick(&mut rng).unwrap();
                    prop_assert!(seen.insert(item), "item {} picked twice", item);
                }
                prop_assert!(pool.remaining().is_empty());
                prop_assert_eq!(seen.len(), size);
            }
        }
    }
}
