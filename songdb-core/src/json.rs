//! JSON Lines dump writer
//!
//! First line is `{"version":"..."}`, then one object per record using the
//! same field names as the XML document.

use std::io::Write;

use serde::Serialize;

use crate::emit::Emitter;
use crate::error::Result;
use crate::score::Score;

#[derive(Serialize)]
struct Header<'a> {
    version: &'a str,
}

pub struct JsonLinesEmitter<W: Write> {
    writer: W,
    line: Vec<u8>,
}

impl<W: Write> JsonLinesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line: Vec::with_capacity(2 * 1024),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, value)?;
        self.line.push(b'\n');
        self.writer.write_all(&self.line)?;
        Ok(())
    }
}

impl<W: Write> Emitter for JsonLinesEmitter<W> {
    fn begin(&mut self, version: &str) -> Result<()> {
        self.write_line(&Header { version })
    }

    fn emit(&mut self, score: &Score) -> Result<()> {
        self.write_line(score)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
