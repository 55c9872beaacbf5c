//! Test-only encoder producing songs.db bytes

use std::io::{self, Read, Seek, SeekFrom};

use crate::date::{Timestamp, TICKS_PER_DAY};
use crate::score::{
    FileInformation, PerInstrument, PerformanceHistory, Score, SongIniInformation,
    SongInformation, SongType,
};

/// A fully populated record with the given title
pub fn sample_score(title: &str) -> Score {
    // 2014-03-09T17:25:41Z
    let modified = Timestamp::from_ticks(635_299_827_410_000_000).unwrap();
    let ini_modified = Timestamp::from_ticks(TICKS_PER_DAY).unwrap();

    Score {
        file_info: FileInformation {
            absolute_file_path: format!("C:\\dtx\\{}\\score.dtx", title),
            absolute_folder_path: format!("C:\\dtx\\{}\\", title),
            last_modified: modified,
            file_size: 48_213,
        },
        song_ini_info: SongIniInformation {
            last_modified: ini_modified,
            file_size: 512,
        },
        song_info: SongInformation {
            title: title.to_string(),
            artist: "Test Artist".into(),
            comment: "".into(),
            genre: "Rock".into(),
            pre_image: "pre.png".into(),
            pre_movie: "".into(),
            pre_sound: "pre.ogg".into(),
            background: "bg.jpg".into(),
            level: PerInstrument::new(45, 38, 0),
            level_dec: PerInstrument::new(5, 0, 0),
            best_rank: PerInstrument::new(1, 99, 99),
            high_skill: PerInstrument::new(87.25, 0.0, 0.0),
            full_combo: PerInstrument::new(true, false, false),
            nb_performance: PerInstrument::new(12, 1, 0),
            performance_history: PerformanceHistory {
                first: "2014/03/09 SS".into(),
                ..Default::default()
            },
            hidden_level: false,
            classic: PerInstrument::new(false, true, false),
            score_exists: PerInstrument::new(true, true, false),
            song_type: SongType::G2D,
            bpm: 145.0,
            duration: 180,
        },
    }
}

#[derive(Default)]
pub struct DbWriter {
    buf: Vec<u8>,
}

impl DbWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn var_uint(&mut self, mut value: u64) -> &mut Self {
        while value >= 0x80 {
            self.buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
        self
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.var_uint(s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.buf.push(v as u8);
        self
    }

    fn i32s(&mut self, v: &PerInstrument<i32>) -> &mut Self {
        self.i32(v.drums).i32(v.guitar).i32(v.bass)
    }

    fn f64s(&mut self, v: &PerInstrument<f64>) -> &mut Self {
        self.f64(v.drums).f64(v.guitar).f64(v.bass)
    }

    fn bools(&mut self, v: &PerInstrument<bool>) -> &mut Self {
        self.bool(v.drums).bool(v.guitar).bool(v.bass)
    }

    /// Encode a full record in on-disk field order
    pub fn score(&mut self, s: &Score) -> &mut Self {
        let file = &s.file_info;
        self.string(&file.absolute_file_path)
            .string(&file.absolute_folder_path)
            .i64(file.last_modified.ticks())
            .i64(file.file_size);

        self.i64(s.song_ini_info.last_modified.ticks())
            .i64(s.song_ini_info.file_size);

        let song = &s.song_info;
        self.string(&song.title)
            .string(&song.artist)
            .string(&song.comment)
            .string(&song.genre)
            .string(&song.pre_image)
            .string(&song.pre_movie)
            .string(&song.pre_sound)
            .string(&song.background)
            .i32s(&song.level)
            .i32s(&song.level_dec)
            .i32s(&song.best_rank)
            .f64s(&song.high_skill)
            .bools(&song.full_combo)
            .i32s(&song.nb_performance);

        let history = &song.performance_history;
        self.string(&history.first)
            .string(&history.second)
            .string(&history.third)
            .string(&history.fourth)
            .string(&history.fifth);

        self.bool(song.hidden_level)
            .bools(&song.classic)
            .bools(&song.score_exists)
            .i32(song.song_type.ordinal())
            .f64(song.bpm)
            .i32(song.duration)
    }
}

/// Yields `data`, then fails every read with `ErrorKind::Other`
pub struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

impl FailingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: io::Cursor::new(data),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 if !buf.is_empty() => Err(io::Error::new(io::ErrorKind::Other, "device error")),
            n => Ok(n),
        }
    }
}

impl Seek for FailingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.data.seek(pos)
    }
}
