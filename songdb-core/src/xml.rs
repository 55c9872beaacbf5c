//! XML dump writer
//!
//! Layout of dump.xml:
//! - `<songs>` on the first line
//! - one `<song>` element per record, indented with a two-space prefix plus
//!   four spaces per nesting level
//! - `</songs>` on the last line, no trailing newline
//!
//! Each record is rendered into a scratch buffer and handed to the sink in a
//! single write, so a reader of the sink never sees half a `<song>`.

use std::fmt::{self, Display, Write as _};
use std::io::{self, Write};

use crate::emit::Emitter;
use crate::error::Result;
use crate::score::{
    FileInformation, PerInstrument, PerformanceHistory, Score, SongIniInformation,
    SongInformation,
};

const ROOT_OPEN: &[u8] = b"<songs>\n";
const ROOT_CLOSE: &[u8] = b"\n</songs>";

const PREFIX: &str = "  ";
const INDENT: &str = "    ";

/// Streams records into a `<songs>` document
pub struct XmlEmitter<W: Write> {
    writer: W,
    scratch: String,
    records: u64,
}

impl<W: Write> XmlEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            scratch: String::with_capacity(4 * 1024),
            records: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Emitter for XmlEmitter<W> {
    fn begin(&mut self, _version: &str) -> Result<()> {
        self.writer.write_all(ROOT_OPEN)?;
        Ok(())
    }

    fn emit(&mut self, score: &Score) -> Result<()> {
        self.scratch.clear();
        if self.records > 0 {
            self.scratch.push('\n');
        }

        let mut out = ElementWriter::new(&mut self.scratch);
        write_score(&mut out, score).map_err(io::Error::other)?;

        self.writer.write_all(self.scratch.as_bytes())?;
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.write_all(ROOT_CLOSE)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Indenting element writer over a string buffer
struct ElementWriter<'a> {
    out: &'a mut String,
    depth: usize,
    started: bool,
}

impl<'a> ElementWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self {
            out,
            depth: 0,
            started: false,
        }
    }

    fn new_line(&mut self) {
        if self.started {
            self.out.push('\n');
        }
        self.started = true;
        self.out.push_str(PREFIX);
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn open(&mut self, name: &str) {
        self.new_line();
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.new_line();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Leaf element with escaped text content
    fn text(&mut self, name: &str, value: &str) {
        self.new_line();
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        escape_into(self.out, value);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Leaf element for values whose rendering never needs escaping
    fn value(&mut self, name: &str, value: impl Display) -> fmt::Result {
        self.new_line();
        write!(self.out, "<{name}>{value}</{name}>")
    }
}

fn write_score(out: &mut ElementWriter<'_>, score: &Score) -> fmt::Result {
    out.open("song");
    write_file_info(out, &score.file_info)?;
    write_song_ini_info(out, &score.song_ini_info)?;
    write_song_info(out, &score.song_info)?;
    out.close("song");
    Ok(())
}

fn write_file_info(out: &mut ElementWriter<'_>, info: &FileInformation) -> fmt::Result {
    out.open("file-info");
    out.text("absolute-file-path", &info.absolute_file_path);
    out.text("absolute-folder-path", &info.absolute_folder_path);
    out.value("last-modified", info.last_modified)?;
    out.value("file-size", info.file_size)?;
    out.close("file-info");
    Ok(())
}

fn write_song_ini_info(out: &mut ElementWriter<'_>, info: &SongIniInformation) -> fmt::Result {
    out.open("song-ini-info");
    out.value("last-modified", info.last_modified)?;
    out.value("file-size", info.file_size)?;
    out.close("song-ini-info");
    Ok(())
}

fn write_song_info(out: &mut ElementWriter<'_>, song: &SongInformation) -> fmt::Result {
    out.open("song-info");
    out.text("title", &song.title);
    out.text("artist", &song.artist);
    out.text("comment", &song.comment);
    out.text("genre", &song.genre);
    out.text("pre-image", &song.pre_image);
    out.text("pre-movie", &song.pre_movie);
    out.text("pre-sound", &song.pre_sound);
    out.text("background", &song.background);
    write_triple(out, "level", &song.level)?;
    write_triple(out, "level-dec", &song.level_dec)?;
    write_triple(out, "best-rank", &song.best_rank)?;
    let high_skill = &song.high_skill;
    let high_skill = PerInstrument::new(
        GoFloat(high_skill.drums),
        GoFloat(high_skill.guitar),
        GoFloat(high_skill.bass),
    );
    write_triple(out, "high-skill", &high_skill)?;
    write_triple(out, "full-combo", &song.full_combo)?;
    write_triple(out, "nb-performance", &song.nb_performance)?;
    write_history(out, &song.performance_history);
    out.value("hidden-level", song.hidden_level)?;
    write_triple(out, "classic", &song.classic)?;
    write_triple(out, "score-exists", &song.score_exists)?;
    out.value("song-type", song.song_type)?;
    out.value("bpm", GoFloat(song.bpm))?;
    out.value("duration", song.duration)?;
    out.close("song-info");
    Ok(())
}

fn write_triple<T: Display>(
    out: &mut ElementWriter<'_>,
    name: &str,
    triple: &PerInstrument<T>,
) -> fmt::Result {
    out.open(name);
    out.value("drums", &triple.drums)?;
    out.value("guitar", &triple.guitar)?;
    out.value("bass", &triple.bass)?;
    out.close(name);
    Ok(())
}

fn write_history(out: &mut ElementWriter<'_>, history: &PerformanceHistory) {
    out.open("performance-history");
    out.text("first", &history.first);
    out.text("second", &history.second);
    out.text("third", &history.third);
    out.text("fourth", &history.fourth);
    out.text("fifth", &history.fifth);
    out.close("performance-history");
}

/// Escape character data the way dump.xml consumers expect
///
/// Quotes, tabs and line breaks become character references; code points
/// that XML 1.0 forbids become U+FFFD.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push('\u{FFFD}'),
        }
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Shortest `%g`-style float rendering
///
/// Plain decimal for exponents in [-4, 6), otherwise `d.ddde±XX`.
/// `145.0` renders as `145`, `1e6` as `1e+06`.
#[derive(Clone, Copy)]
struct GoFloat(f64);

impl Display for GoFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" });
        }
        if v == 0.0 {
            return f.write_str(if v.is_sign_negative() { "-0" } else { "0" });
        }

        let sci = format!("{:e}", v);
        let Some((mantissa, exp)) = sci.split_once('e') else {
            return f.write_str(&sci);
        };
        let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;

        if (-4..6).contains(&exp) {
            write!(f, "{}", v)
        } else {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
        }
    }
}
