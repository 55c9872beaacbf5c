//! Record stream over a songs.db file
//!
//! File layout: one version string, then records back to back until the end
//! of the file. There is no record count and no terminator, so the only end
//! marker is running out of input exactly where a record would start.
//! Running out anywhere else means the file is cut short.

use std::io::{Read, Seek};

use tracing::{debug, info};

use crate::cursor::ByteCursor;
use crate::emit::Emitter;
use crate::error::{Error, Result};
use crate::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Done,
}

/// Yields one [`Score`] per record until a clean end of input
///
/// After the end, or after any error, the stream yields nothing more.
pub struct ScoreStream<R> {
    cursor: ByteCursor<R>,
    version: String,
    state: State,
    records: u64,
}

impl<R: Read + Seek> ScoreStream<R> {
    /// Read the leading version string
    pub fn open(mut cursor: ByteCursor<R>) -> Result<Self> {
        let version = cursor.read_string()?;
        Ok(Self {
            cursor,
            version,
            state: State::Reading,
            records: 0,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Records decoded so far
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Decode the next record, `Ok(None)` at a clean end of input
    pub fn next_score(&mut self) -> Result<Option<Score>> {
        if self.state == State::Done {
            return Ok(None);
        }

        let start = self.cursor.position();
        match Score::read(&mut self.cursor) {
            Ok(score) => {
                debug!(
                    "Record #{} at offset {}: {}",
                    self.records, start, score.song_info.title
                );
                self.records += 1;
                Ok(Some(score))
            }
            Err(e) => {
                self.state = State::Done;
                if !e.is_truncation() {
                    return Err(e);
                }
                if self.cursor.position() == start {
                    return Ok(None);
                }
                Err(Error::CorruptRecord {
                    index: self.records,
                    offset: start,
                    source: Box::new(e),
                })
            }
        }
    }
}

impl<R: Read + Seek> Iterator for ScoreStream<R> {
    type Item = Result<Score>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_score().transpose()
    }
}

/// Outcome of a complete dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    pub version: String,
    pub records: u64,
}

/// Decode every record from `cursor` into `emitter`
///
/// Records are emitted as they are decoded. On error the emitter is left
/// without its closing `finish`, holding whatever was emitted before.
pub fn dump<R, E>(cursor: ByteCursor<R>, emitter: &mut E) -> Result<DumpSummary>
where
    R: Read + Seek,
    E: Emitter + ?Sized,
{
    let mut stream = ScoreStream::open(cursor)?;
    info!("SongDB version: {}", stream.version());

    emitter.begin(stream.version())?;
    while let Some(score) = stream.next_score()? {
        emitter.emit(&score)?;
    }
    emitter.finish()?;

    Ok(DumpSummary {
        version: stream.version,
        records: stream.records,
    })
}
