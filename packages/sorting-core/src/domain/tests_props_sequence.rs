//! Property tests for pile assignment over random action scripts.
//!
//! Increase cases locally with: PROPTEST_CASES=800 cargo test -p sorting-core

use std::collections::HashSet;
use std::env;

use proptest::prelude::*;

use super::{Item, Presentation, Sequence};
use crate::config::RoundConfig;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Action {
    Sort(usize),
    AutoSkip,
    StaleAutoSkip,
    Advance,
    Resume,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0usize..9).prop_map(Action::Sort),
        1 => Just(Action::AutoSkip),
        1 => Just(Action::StaleAutoSkip),
        1 => Just(Action::Advance),
        3 => Just(Action::Resume),
    ]
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_every_item_lands_in_at_most_one_pile(
        n in 1usize..12,
        pile_count in 1usize..8,
        shuffle in any::<bool>(),
        seed in any::<u64>(),
        script in prop::collection::vec(action(), 0..80),
    ) {
        let config = RoundConfig {
            shuffle_on_start: shuffle,
            pile_count,
            seed: Some(seed),
            ..RoundConfig::default()
        };
        let catalog: Vec<Item> = (0..n).map(|i| Item::new(format!("item-{i}"))).collect();
        let mut seq = Sequence::new(catalog, &config).unwrap();
        seq.start();

        let mut sorted = Vec::new();
        let mut skipped = Vec::new();

        let mut apply = |seq: &mut Sequence, action: &Action| {
            match action {
                Action::Sort(pile) => {
                    if let Ok(s) = seq.sort_current_into_pile(*pile) {
                        sorted.push(s.item.display_name().to_string());
                    }
                }
                Action::AutoSkip => {
                    if let Some(index) = seq.current_index() {
                        if let Some(s) = seq.auto_skip(index) {
                            skipped.push(s.item.display_name().to_string());
                        }
                    }
                }
                Action::StaleAutoSkip => {
                    if let Some(index) = seq.current_index().and_then(|i| i.checked_sub(1)) {
                        prop_assert!(seq.auto_skip(index).is_none());
                    }
                }
                Action::Advance => match seq.present_next() {
                    Presentation::Presented { discarded: Some(item), .. }
                    | Presentation::Finished { discarded: Some(item), .. } => {
                        skipped.push(item.display_name().to_string());
                    }
                    _ => {}
                },
                Action::Resume => {
                    if seq.is_waiting() {
                        seq.resume();
                    }
                }
            }
            Ok(())
        };

        for step in &script {
            apply(&mut seq, step)?;
        }

        // Drain: skip whatever remains so the round completes.
        while !seq.is_finished() {
            if seq.is_waiting() {
                seq.resume();
            } else if let Some(index) = seq.current_index() {
                if let Some(s) = seq.auto_skip(index) {
                    skipped.push(s.item.display_name().to_string());
                }
            }
        }

        let mut seen = HashSet::new();
        for (_, items) in seq.piles().iter() {
            for item in items {
                prop_assert!(seen.insert(item.display_name().to_string()), "item in two piles");
            }
        }
        prop_assert_eq!(seen.len(), sorted.len());
        prop_assert_eq!(sorted.len() + skipped.len(), n);
        for name in &skipped {
            prop_assert!(!seen.contains(name));
        }
        prop_assert_eq!(seq.piles().pile_count(), pile_count);
    }
}
