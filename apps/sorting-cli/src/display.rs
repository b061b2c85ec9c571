//! Text rendering for the terminal round.

use sorting_core::{GradeError, GradeResult, Item, PileStore, Winner};

pub fn headline(winner: Winner) -> &'static str {
    match winner {
        Winner::A => "PLAYER A WINS",
        Winner::B => "PLAYER B WINS",
        Winner::Tie => "TIE GAME",
    }
}

pub fn verdict(result: &GradeResult) -> String {
    let mut out = format!(
        "{}\nPlayer A: {}\nPlayer B: {}",
        headline(result.winner),
        result.score_a.round() as i64,
        result.score_b.round() as i64,
    );
    if !result.reason.is_empty() {
        out.push_str("\n\n");
        out.push_str(&result.reason);
    }
    out
}

pub fn presented(index: usize, total: usize, item: &Item) -> String {
    let mut out = format!("[{}/{}] {}", index + 1, total, item.display_name());
    if let Some(description) = item.description() {
        out.push_str(" - ");
        out.push_str(description);
    }
    out
}

pub fn piles(store: &PileStore) -> String {
    store
        .pile_ids()
        .map(|id| format!("[Player {}] {}", store.owner(id), store.describe(id)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn grade_failure(err: &GradeError) -> String {
    let mut out = format!("Grading failed ({}): {err}", err.kind());
    if let Some(status) = err.status() {
        out.push_str(&format!("\nstatus: {status}"));
    }
    if let Some(raw) = err.raw_body().filter(|raw| !raw.is_empty()) {
        out.push_str("\nresponse: ");
        out.push_str(raw);
    }
    out
}
