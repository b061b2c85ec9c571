//! One interactive (or autoplayed) round from first item to verdict.

use std::sync::Arc;

use sorting_core::sequencer::{self, SequenceEvent, SkipReason};
use sorting_core::{GradingClient, Item, PileStore, RoundConfig, Sequence, SequencerError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::autoplay::Autoplayer;
use crate::display;
use crate::error::CliError;
use crate::keymap::{self, Action};

pub struct RoundOptions {
    pub round: RoundConfig,
    pub autoplay: bool,
}

/// Play one round and grade it. Returns `Ok(false)` when the operator quit.
pub async fn play(
    catalog: Vec<Item>,
    options: RoundOptions,
    client: Arc<GradingClient>,
) -> Result<bool, CliError> {
    spawn_health_probe(client.clone());

    let sequence = Sequence::new(catalog, &options.round)?;
    let total = sequence.queue().len();
    let Some(piles) = drive(sequence, total, &options).await? else {
        println!("Round abandoned.");
        return Ok(false);
    };

    println!("\n{}\n", display::piles(&piles));
    println!("Grading...");
    match client.grade(&piles).await {
        Ok(result) => {
            println!("\n{}", display::verdict(&result));
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", display::grade_failure(&err));
            Err(err.into())
        }
    }
}

/// The health probe never holds up the round.
fn spawn_health_probe(client: Arc<GradingClient>) {
    tokio::spawn(async move {
        match client.health_check().await {
            Ok(health) if health.ok => info!(version = %health.version, "grader is up"),
            Ok(health) => warn!(version = %health.version, "grader reports not ok"),
            Err(err) => warn!(error = %err, "grader health check failed"),
        }
    });
}

async fn drive(
    sequence: Sequence,
    total: usize,
    options: &RoundOptions,
) -> Result<Option<PileStore>, CliError> {
    let mut autoplayer = options
        .autoplay
        .then(|| Autoplayer::new(options.round.pile_count, options.round.seed));

    let (handle, mut events) = sequencer::spawn(sequence);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = autoplayer.is_none();

    if stdin_open {
        println!("{}", keymap::HELP);
    }
    println!("{total} items this round.");
    handle.start()?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SequenceEvent::ItemPresented { index, item }) => {
                    println!("{}", display::presented(index, total, &item));
                    if let Some(bot) = autoplayer.as_mut() {
                        let pile = bot.choose_pile();
                        report_sort(handle.sort_current_into_pile(pile).await)?;
                    }
                }
                Some(SequenceEvent::ItemSorted { item, pile, .. }) => {
                    println!("  -> {} into pile {pile}", item.display_name());
                }
                Some(SequenceEvent::ItemSkipped { item, reason, .. }) => {
                    let why = match reason {
                        SkipReason::Timeout => "too slow",
                        SkipReason::Advanced => "skipped",
                    };
                    println!("  -> {} discarded ({why})", item.display_name());
                }
                Some(SequenceEvent::Finished(piles)) => return Ok(Some(piles)),
                None => return Err(CliError::RoundAborted),
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match keymap::parse(&line) {
                    Action::Sort(pile) => report_sort(handle.sort_current_into_pile(pile).await)?,
                    Action::Advance => handle.present_next()?,
                    Action::Quit => return Ok(None),
                    Action::Unknown => println!("{}", keymap::HELP),
                },
                None => {
                    info!("input closed; remaining items will time out");
                    stdin_open = false;
                }
            },
        }
    }
}

/// Rejected sorts are reported and the round carries on.
fn report_sort<T>(result: Result<T, SequencerError>) -> Result<(), CliError> {
    match result {
        Ok(_) => Ok(()),
        Err(err @ SequencerError::Closed) => Err(err.into()),
        Err(err) => {
            println!("  ! {err}");
            Ok(())
        }
    }
}
