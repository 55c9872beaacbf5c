//! Output sinks for decoded records

use crate::error::Result;
use crate::score::Score;

/// Receives records one at a time as the stream produces them
///
/// `begin` is called once before the first record and `finish` once after
/// the last. A failed run never reaches `finish`.
pub trait Emitter {
    fn begin(&mut self, version: &str) -> Result<()>;

    /// Write one complete record
    fn emit(&mut self, score: &Score) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

impl<E: Emitter + ?Sized> Emitter for Box<E> {
    fn begin(&mut self, version: &str) -> Result<()> {
        (**self).begin(version)
    }

    fn emit(&mut self, score: &Score) -> Result<()> {
        (**self).emit(score)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
