//! Terminal keys to round actions.
//!
//! Player A sorts with `a` `s` `d` (piles 1-3), Player B with `j` `k` `l`
//! (piles 4-6). A number picks any pile directly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Sort(usize),
    Advance,
    Quit,
    Unknown,
}

pub fn parse(line: &str) -> Action {
    let key = line.trim().to_lowercase();
    match key.as_str() {
        "" | "n" => Action::Advance,
        "q" => Action::Quit,
        "a" => Action::Sort(1),
        "s" => Action::Sort(2),
        "d" => Action::Sort(3),
        "j" => Action::Sort(4),
        "k" => Action::Sort(5),
        "l" => Action::Sort(6),
        other => other.parse().map(Action::Sort).unwrap_or(Action::Unknown),
    }
}

pub const HELP: &str =
    "keys: a/s/d = piles 1-3 (Player A), j/k/l = piles 4-6 (Player B), <number> = pile, n or enter = skip, q = quit";
