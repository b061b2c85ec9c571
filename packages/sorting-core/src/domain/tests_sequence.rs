use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Item, Phase, Presentation, Sequence};
use crate::config::RoundConfig;
use crate::error::SequencerError;

fn items(n: usize) -> Vec<Item> {
    (1..=n).map(|i| Item::new(format!("item{i}"))).collect()
}

fn fixed_order() -> RoundConfig {
    RoundConfig {
        shuffle_on_start: false,
        ..RoundConfig::default()
    }
}

fn started(n: usize, config: &RoundConfig) -> Sequence {
    let mut seq = Sequence::new(items(n), config).unwrap();
    seq.start().unwrap();
    seq
}

fn names(seq: &Sequence, pile: usize) -> Vec<String> {
    let id = seq.piles().resolve(pile).unwrap();
    seq.piles()
        .items(id)
        .iter()
        .map(|i| i.display_name().to_string())
        .collect()
}

#[test]
fn test_empty_catalog_is_rejected() {
    let err = Sequence::new(Vec::new(), &fixed_order()).unwrap_err();
    assert_eq!(err, SequencerError::EmptyCatalog);
}

#[test]
fn test_new_sequence_has_not_presented() {
    let seq = Sequence::new(items(3), &fixed_order()).unwrap();
    assert_eq!(seq.phase(), Phase::NotStarted);
    assert_eq!(seq.current_index(), None);
    assert!(seq.current_item().is_none());
    assert_eq!(seq.piles().pile_count(), 6);
}

#[test]
fn test_start_is_accepted_once() {
    let mut seq = Sequence::new(items(2), &fixed_order()).unwrap();
    assert_eq!(seq.start(), Some(Duration::from_millis(1500)));
    assert_eq!(seq.phase(), Phase::Waiting);
    assert_eq!(seq.start(), None);
}

#[test]
fn test_present_next_before_start_is_ignored() {
    let mut seq = Sequence::new(items(2), &fixed_order()).unwrap();
    assert_eq!(seq.present_next(), Presentation::Ignored);
    assert_eq!(seq.current_index(), None);
}

#[test]
fn test_present_next_during_lockout_is_ignored() {
    let mut seq = started(2, &fixed_order());
    assert_eq!(seq.present_next(), Presentation::Ignored);
    assert_eq!(seq.current_index(), None);
}

#[test]
fn test_resume_presents_first_item_with_auto_skip() {
    let mut seq = started(2, &fixed_order());
    match seq.resume() {
        Presentation::Presented {
            index,
            item,
            auto_skip,
            discarded,
        } => {
            assert_eq!(index, 0);
            assert_eq!(item.display_name(), "item1");
            assert_eq!(auto_skip, Some(Duration::from_secs(3)));
            assert!(discarded.is_none());
        }
        other => panic!("expected presentation, got {other:?}"),
    }
    assert_eq!(seq.phase(), Phase::Presenting);
}

#[test]
fn test_sort_appends_and_locks_out() {
    let mut seq = started(2, &fixed_order());
    seq.resume();

    let sorted = seq.sort_current_into_pile(4).unwrap();
    assert_eq!(sorted.pile.get(), 4);
    assert_eq!(sorted.item.display_name(), "item1");
    assert_eq!(sorted.next_in, Duration::from_millis(1500));
    assert!(seq.current_item().is_none());
    assert!(seq.is_waiting());
    assert_eq!(names(&seq, 4), vec!["item1"]);

    // A second sort during the lockout changes nothing.
    let err = seq.sort_current_into_pile(4).unwrap_err();
    assert!(matches!(err, SequencerError::NotAccepting { .. }));
    assert_eq!(names(&seq, 4), vec!["item1"]);
}

#[test]
fn test_sort_into_invalid_pile_changes_nothing() {
    let mut seq = started(2, &fixed_order());
    seq.resume();

    for pile in [0, 7, 100] {
        let err = seq.sort_current_into_pile(pile).unwrap_err();
        assert_eq!(
            err,
            SequencerError::InvalidPileId {
                pile,
                pile_count: 6
            }
        );
    }
    assert_eq!(seq.phase(), Phase::Presenting);
    assert_eq!(seq.current_item().map(Item::display_name), Some("item1"));
    assert_eq!(seq.piles().total_items(), 0);
}

#[test]
fn test_auto_skip_discards_without_placing() {
    let mut seq = started(2, &fixed_order());
    seq.resume();

    let skipped = seq.auto_skip(0).unwrap();
    assert_eq!(skipped.item.display_name(), "item1");
    assert!(seq.current_item().is_none());
    assert!(seq.is_waiting());
    assert_eq!(seq.piles().total_items(), 0);
}

#[test]
fn test_auto_skip_after_sort_is_inert() {
    let mut seq = started(2, &fixed_order());
    seq.resume();
    seq.sort_current_into_pile(1).unwrap();

    assert!(seq.auto_skip(0).is_none());
    assert_eq!(names(&seq, 1), vec!["item1"]);
}

#[test]
fn test_stale_auto_skip_for_previous_item_is_inert() {
    let mut seq = started(3, &fixed_order());
    seq.resume();
    seq.sort_current_into_pile(1).unwrap();
    seq.resume();

    assert!(seq.auto_skip(0).is_none());
    assert_eq!(seq.current_item().map(Item::display_name), Some("item2"));
}

#[test]
fn test_sort_after_auto_skip_is_rejected() {
    let mut seq = started(2, &fixed_order());
    seq.resume();
    seq.auto_skip(0).unwrap();

    assert!(seq.sort_current_into_pile(2).is_err());
    assert_eq!(seq.piles().total_items(), 0);
}

#[test]
fn test_manual_advance_discards_current_item() {
    let mut seq = started(3, &fixed_order());
    seq.resume();

    match seq.present_next() {
        Presentation::Presented {
            index, discarded, ..
        } => {
            assert_eq!(index, 1);
            assert_eq!(discarded.map(|i| i.display_name().to_string()), Some("item1".into()));
        }
        other => panic!("expected presentation, got {other:?}"),
    }
    assert_eq!(seq.piles().total_items(), 0);
}

#[test]
fn test_six_items_into_six_piles_finishes() {
    let mut seq = started(6, &fixed_order());

    for pile in 1..=6 {
        assert!(matches!(seq.resume(), Presentation::Presented { .. }));
        seq.sort_current_into_pile(pile).unwrap();
    }
    match seq.resume() {
        Presentation::Finished { piles: store, .. } => {
            for (pile, items) in store.iter() {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].display_name(), format!("item{pile}"));
            }
        }
        other => panic!("expected finish, got {other:?}"),
    }

    assert_eq!(seq.phase(), Phase::Finished);
    assert!(seq.current_item().is_none());
    assert_eq!(seq.current_index(), Some(6));
}

#[test]
fn test_finished_is_terminal() {
    let mut seq = started(1, &fixed_order());
    seq.resume();
    seq.sort_current_into_pile(2).unwrap();
    assert!(matches!(seq.resume(), Presentation::Finished { .. }));

    let before = seq.piles().clone();
    assert_eq!(seq.resume(), Presentation::Ignored);
    assert_eq!(seq.present_next(), Presentation::Ignored);
    assert!(seq.sort_current_into_pile(2).is_err());
    assert!(seq.auto_skip(0).is_none());
    assert_eq!(seq.start(), None);
    assert_eq!(seq.piles(), &before);
    assert_eq!(seq.phase(), Phase::Finished);
}

#[test]
fn test_item_limit_is_applied_after_shuffle() {
    let config = RoundConfig {
        shuffle_on_start: true,
        item_limit: 3,
        ..RoundConfig::default()
    };
    let catalog = items(20);

    let mut rng = StdRng::seed_from_u64(7);
    let seq = Sequence::with_rng(catalog.clone(), &config, &mut rng).unwrap();
    assert_eq!(seq.queue().len(), 3);
    assert!(seq.queue().iter().all(|i| catalog.contains(i)));

    // Across seeds, the subset is not always the original prefix.
    let prefix = &catalog[..3];
    let differs = (0..16u64).any(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let seq = Sequence::with_rng(catalog.clone(), &config, &mut rng).unwrap();
        seq.queue() != prefix
    });
    assert!(differs);
}

#[test]
fn test_limit_larger_than_catalog_keeps_everything() {
    let config = RoundConfig {
        shuffle_on_start: false,
        item_limit: 50,
        ..RoundConfig::default()
    };
    let seq = Sequence::new(items(4), &config).unwrap();
    assert_eq!(seq.queue(), items(4).as_slice());
}

#[test]
fn test_same_seed_same_order() {
    let config = RoundConfig {
        seed: Some(99),
        ..RoundConfig::default()
    };
    let a = Sequence::new(items(10), &config).unwrap();
    let b = Sequence::new(items(10), &config).unwrap();
    assert_eq!(a.queue(), b.queue());
}
