//! Score records and their fixed-order reader
//!
//! A record has no field tags and no presence bitmap. Every field is read
//! unconditionally in the order below; reading out of order misaligns
//! everything after it.
//!
//! ```text
//! file-info      string path, string folder, date, i64 size
//! song-ini-info  date, i64 size
//! song-info      string x8, i32x3 level, i32x3 level-dec, i32x3 best-rank,
//!                f64x3 high-skill, boolx3 full-combo, i32x3 nb-performance,
//!                string x5 history, bool hidden-level, boolx3 classic,
//!                boolx3 score-exists, i32 song-type, f64 bpm, i32 duration
//! ```

use std::fmt;
use std::io::{Read, Seek};

use serde::{Serialize, Serializer};

use crate::cursor::ByteCursor;
use crate::date::Timestamp;
use crate::error::Result;

/// One song/chart entry of the database
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Score {
    pub file_info: FileInformation,
    pub song_ini_info: SongIniInformation,
    pub song_info: SongInformation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileInformation {
    pub absolute_file_path: String,
    pub absolute_folder_path: String,
    pub last_modified: Timestamp,
    /// Size in bytes
    pub file_size: i64,
}

/// Metadata of the song's companion .ini file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SongIniInformation {
    pub last_modified: Timestamp,
    pub file_size: i64,
}

/// Fixed drums/guitar/bass triple
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerInstrument<T> {
    pub drums: T,
    pub guitar: T,
    pub bass: T,
}

impl<T> PerInstrument<T> {
    pub fn new(drums: T, guitar: T, bass: T) -> Self {
        Self { drums, guitar, bass }
    }

    fn read_with<R, F>(cursor: &mut ByteCursor<R>, mut read: F) -> Result<Self>
    where
        R: Read + Seek,
        F: FnMut(&mut ByteCursor<R>) -> Result<T>,
    {
        let drums = read(cursor)?;
        let guitar = read(cursor)?;
        let bass = read(cursor)?;
        Ok(Self { drums, guitar, bass })
    }
}

/// Five best performances, best first
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PerformanceHistory {
    pub first: String,
    pub second: String,
    pub third: String,
    pub fourth: String,
    pub fifth: String,
}

/// Chart file format
///
/// Ordinals 0..=5 have a label. Other values are kept as-is and only lack
/// the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SongType(i32);

impl SongType {
    pub const DTX: SongType = SongType(0);
    pub const GDA: SongType = SongType(1);
    pub const G2D: SongType = SongType(2);
    pub const BMS: SongType = SongType(3);
    pub const BME: SongType = SongType(4);
    pub const SMF: SongType = SongType(5);

    const LABELS: [&'static str; 6] = ["DTX", "GDA", "G2D", "BMS", "BME", "SMF"];

    pub fn from_ordinal(ordinal: i32) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(&self) -> i32 {
        self.0
    }

    pub fn label(&self) -> Option<&'static str> {
        usize::try_from(self.0)
            .ok()
            .and_then(|i| Self::LABELS.get(i).copied())
    }
}

impl fmt::Display for SongType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for SongType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.label() {
            Some(label) => serializer.serialize_str(label),
            None => serializer.serialize_i32(self.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SongInformation {
    pub title: String,
    pub artist: String,
    pub comment: String,
    pub genre: String,
    pub pre_image: String,
    pub pre_movie: String,
    pub pre_sound: String,
    pub background: String,
    pub level: PerInstrument<i32>,
    pub level_dec: PerInstrument<i32>,
    pub best_rank: PerInstrument<i32>,
    pub high_skill: PerInstrument<f64>,
    pub full_combo: PerInstrument<bool>,
    pub nb_performance: PerInstrument<i32>,
    pub performance_history: PerformanceHistory,
    pub hidden_level: bool,
    pub classic: PerInstrument<bool>,
    pub score_exists: PerInstrument<bool>,
    pub song_type: SongType,
    pub bpm: f64,
    /// Length in seconds
    pub duration: i32,
}

impl Score {
    /// Decode one record from the cursor's current position
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let file_info = FileInformation::read(cursor)?;
        let song_ini_info = SongIniInformation::read(cursor)?;
        let song_info = SongInformation::read(cursor)?;
        Ok(Self {
            file_info,
            song_ini_info,
            song_info,
        })
    }
}

impl FileInformation {
    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let absolute_file_path = cursor.read_string()?;
        let absolute_folder_path = cursor.read_string()?;
        let last_modified = cursor.read_date()?;
        let file_size = cursor.read_i64()?;
        Ok(Self {
            absolute_file_path,
            absolute_folder_path,
            last_modified,
            file_size,
        })
    }
}

impl SongIniInformation {
    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let last_modified = cursor.read_date()?;
        let file_size = cursor.read_i64()?;
        Ok(Self {
            last_modified,
            file_size,
        })
    }
}

impl PerformanceHistory {
    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let first = cursor.read_string()?;
        let second = cursor.read_string()?;
        let third = cursor.read_string()?;
        let fourth = cursor.read_string()?;
        let fifth = cursor.read_string()?;
        Ok(Self {
            first,
            second,
            third,
            fourth,
            fifth,
        })
    }
}

impl SongInformation {
    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let title = cursor.read_string()?;
        let artist = cursor.read_string()?;
        let comment = cursor.read_string()?;
        let genre = cursor.read_string()?;
        let pre_image = cursor.read_string()?;
        let pre_movie = cursor.read_string()?;
        let pre_sound = cursor.read_string()?;
        let background = cursor.read_string()?;

        let level = PerInstrument::read_with(cursor, ByteCursor::read_i32)?;
        let level_dec = PerInstrument::read_with(cursor, ByteCursor::read_i32)?;
        let best_rank = PerInstrument::read_with(cursor, ByteCursor::read_i32)?;
        let high_skill = PerInstrument::read_with(cursor, ByteCursor::read_f64)?;
        let full_combo = PerInstrument::read_with(cursor, ByteCursor::read_bool)?;
        let nb_performance = PerInstrument::read_with(cursor, ByteCursor::read_i32)?;
        let performance_history = PerformanceHistory::read(cursor)?;
        let hidden_level = cursor.read_bool()?;
        let classic = PerInstrument::read_with(cursor, ByteCursor::read_bool)?;
        let score_exists = PerInstrument::read_with(cursor, ByteCursor::read_bool)?;
        let song_type = SongType::from_ordinal(cursor.read_i32()?);
        let bpm = cursor.read_f64()?;
        let duration = cursor.read_i32()?;

        Ok(Self {
            title,
            artist,
            comment,
            genre,
            pre_image,
            pre_movie,
            pre_sound,
            background,
            level,
            level_dec,
            best_rank,
            high_skill,
            full_combo,
            nb_performance,
            performance_history,
            hidden_level,
            classic,
            score_exists,
            song_type,
            bpm,
            duration,
        })
    }
}
