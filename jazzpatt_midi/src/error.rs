// Error type shared by every stage of the converter.
//
// There is no recovery anywhere in the pipeline: each variant is propagated
// to the batch driver, which aborts on the first one.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pattern table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("MIDI parse error: {0}")]
    Midi(#[from] midly::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid render config: {0}")]
    InvalidConfig(&'static str),

    #[error("row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },

    #[error("row {row}: invalid interval list {literal:?}: {source}")]
    IntervalLiteral {
        row: usize,
        literal: String,
        source: crate::table::LiteralError,
    },

    #[error("delta of {0} ticks exceeds the MIDI limit of 268435455")]
    DeltaOutOfRange(u32),

    #[error("MIDI write error: {0}")]
    MidiWrite(String),

    #[error("{what} {value} is outside the MIDI range 0-127")]
    ValueOutOfRange { what: &'static str, value: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;
