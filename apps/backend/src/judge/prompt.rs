use crate::piles::PileEntry;

const PREAMBLE: &str = r#"You are judging a sorting game match between two players.

Player A controls piles 1, 2, 3.
Player B controls piles 4, 5, 6.

Each pile contains item names only (strings).
Judge which player sorted better.

Criteria:
- Items within each pile should belong together by a sensible inferred category.
- A player's three piles should be meaningfully different from each other.
- Empty piles are bad.
- Mixing unrelated items is bad.
- Find every possible connection that items might have in a reasonable way
- The more niche the category or connection is, the higher you score

Return ONLY valid JSON.
Do NOT use markdown.
Do NOT use backticks.
Do NOT add explanations outside JSON.

Return JSON in EXACTLY this schema:
{
  "winner": "A" | "B" | "Tie",
  "scoreA": number,
  "scoreB": number,
  "reason": string
}

Rules:
- Scores must be 0–100.
- Higher score must win.
- Use "Tie" if scores are the same.
- Reason must be short (1–3 sentences).
- Do NOT invent items.

Piles:
"#;

/// Head-to-head judging prompt with the six piles embedded as pretty JSON.
pub fn build_prompt(piles: &[PileEntry]) -> Result<String, serde_json::Error> {
    let piles_json = serde_json::to_string_pretty(piles)?;
    Ok(format!("{PREAMBLE}{piles_json}\n"))
}
