use std::path::PathBuf;

use sorting_core::{ConfigError, GradeError, SequencerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read catalog {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    CatalogFormat(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error("terminal input failed: {0}")]
    Input(#[from] std::io::Error),
    #[error("round ended before it finished")]
    RoundAborted,
}
