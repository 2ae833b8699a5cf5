//! 上游沒有提供 age、gender、size，這裡以亂數合成，僅供畫面呈現的多樣性，
//! 不代表真實的品種或個體資訊。

use crate::domain::model::{Gender, Size};
use crate::domain::ports::SizePolicy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesizedAttributes {
    pub age: u8,
    pub gender: Gender,
    pub size: Size,
}

pub struct AttributeSynthesizer {
    rng: Mutex<StdRng>,
    size_policy: SizePolicy,
}

impl AttributeSynthesizer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            size_policy: SizePolicy::Random,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_size_policy(mut self, size_policy: SizePolicy) -> Self {
        self.size_policy = size_policy;
        self
    }

    pub fn attributes(&self) -> SynthesizedAttributes {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let age = rng.gen_range(MIN_AGE..=MAX_AGE);
        let gender = if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let size = match self.size_policy {
            SizePolicy::Fixed(size) => size,
            SizePolicy::Random => Size::ALL[rng.gen_range(0..Size::ALL.len())],
        };

        SynthesizedAttributes { age, gender, size }
    }

    /// 不重複抽樣；數量不足時回傳全部
    pub fn sample<T: Clone>(&self, items: &[T], amount: usize) -> Vec<T> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        items.choose_multiple(&mut *rng, amount).cloned().collect()
    }
}

impl Default for AttributeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_attributes_stay_in_range() {
        let synth = AttributeSynthesizer::new().with_seed(7);
        for _ in 0..200 {
            let attrs = synth.attributes();
            assert!((MIN_AGE..=MAX_AGE).contains(&attrs.age));
        }
    }

    #[test]
    fn test_fixed_size_policy() {
        let synth = AttributeSynthesizer::new().with_size_policy(SizePolicy::Fixed(Size::Small));
        assert!((0..50).all(|_| synth.attributes().size == Size::Small));
    }

    #[test]
    fn test_same_seed_same_attributes() {
        let a = AttributeSynthesizer::new().with_seed(42);
        let b = AttributeSynthesizer::new().with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.attributes(), b.attributes());
        }
    }

    #[test]
    fn test_sample_without_replacement() {
        let synth = AttributeSynthesizer::new().with_seed(1);
        let items: Vec<u32> = (0..20).collect();

        let picked = synth.sample(&items, 10);
        assert_eq!(picked.len(), 10);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 10);

        let all = synth.sample(&items[..3], 10);
        assert_eq!(all.len(), 3);
    }
}
