//! Script classification for the four supported South-East-Asian scripts.
//!
//! Each code point maps to at most one script by a fixed half-open Unicode
//! range. Classification is a pure per-character function; there is no
//! contextual disambiguation.

/// A script with a trained word-segmentation model.
///
/// Code points outside all four ranges have no script; [`Script::of`]
/// returns `None` for them and the dispatcher skips such runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Thai, `U+0E00..U+0E80`.
    Thai,
    /// Lao, `U+0E80..U+0F00`.
    Lao,
    /// Burmese (Myanmar), `U+1000..U+10A0`.
    Burmese,
    /// Khmer, `U+1780..U+1800`.
    Khmer,
}

impl Script {
    /// All supported scripts, in dispatch order.
    pub const ALL: [Script; 4] = [Script::Thai, Script::Lao, Script::Burmese, Script::Khmer];

    /// Classifies a single code point.
    #[inline]
    pub fn of(ch: char) -> Option<Script> {
        match ch as u32 {
            0x0E00..=0x0E7F => Some(Script::Thai),
            0x0E80..=0x0EFF => Some(Script::Lao),
            0x1000..=0x109F => Some(Script::Burmese),
            0x1780..=0x17FF => Some(Script::Khmer),
            _ => None,
        }
    }

    /// Lowercase script name, used in log output and model file names.
    pub fn name(self) -> &'static str {
        match self {
            Script::Thai => "thai",
            Script::Lao => "lao",
            Script::Burmese => "burmese",
            Script::Khmer => "khmer",
        }
    }
}
