//! songdb-core: decoder for rhythm-game library databases (songs.db)
//!
//! This crate provides:
//! - positional decoding of the tag-free songs.db record layout
//! - a record stream that stops cleanly at the end of the file
//! - streaming emitters for the XML dump and JSON Lines
//!
//! All multi-byte values are little-endian.

pub mod cursor;
pub mod date;
pub mod emit;
pub mod error;
pub mod json;
pub mod score;
pub mod stream;
pub mod xml;

#[cfg(test)]
mod testutil;

pub use cursor::ByteCursor;
pub use date::Timestamp;
pub use emit::Emitter;
pub use error::{Error, Result};
pub use json::JsonLinesEmitter;
pub use score::{
    FileInformation, PerInstrument, PerformanceHistory, Score, SongIniInformation,
    SongInformation, SongType,
};
pub use stream::{dump, DumpSummary, ScoreStream};
pub use xml::XmlEmitter;
