use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sorts every presented item into a random pile.
pub struct Autoplayer {
    rng: StdRng,
    pile_count: usize,
}

impl Autoplayer {
    pub fn new(pile_count: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            pile_count: pile_count.max(1),
        }
    }

    pub fn choose_pile(&mut self) -> usize {
        self.rng.random_range(1..=self.pile_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_stay_in_range() {
        let mut bot = Autoplayer::new(6, Some(7));
        for _ in 0..200 {
            assert!((1..=6).contains(&bot.choose_pile()));
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let mut a = Autoplayer::new(6, Some(42));
        let mut b = Autoplayer::new(6, Some(42));
        let left: Vec<_> = (0..20).map(|_| a.choose_pile()).collect();
        let right: Vec<_> = (0..20).map(|_| b.choose_pile()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_single_pile() {
        let mut bot = Autoplayer::new(0, None);
        assert_eq!(bot.choose_pile(), 1);
    }
}
