#![allow(dead_code)]

use sorting_core::{Item, RoundConfig};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub fn items(n: usize) -> Vec<Item> {
    (1..=n).map(|i| Item::new(format!("item{i}"))).collect()
}

/// Default timings, catalog order preserved.
pub fn unshuffled() -> RoundConfig {
    RoundConfig {
        shuffle_on_start: false,
        ..RoundConfig::default()
    }
}
