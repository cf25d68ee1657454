//! Glyph decoding: one display unit at a time.
//!
//! A glyph is an ASCII byte or one multi-byte UTF-8 codepoint, with its
//! terminal column width. Escape sequences are not decoded here; the
//! renderer scans those separately because they are zero-width atomic units.
//!
//! The width policy is a pragmatic approximation of East-Asian width rules
//! backed by fixed interval tables, not full Unicode property data.

/// Codepoint substituted for invalid or truncated UTF-8.
pub const REPLACEMENT: u32 = 0xFFFD;

/// One decoded display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Bytes consumed from the buffer, 1-4.
    pub len: usize,
    /// Terminal columns occupied: 0, 1 or 2.
    pub width: usize,
    /// The decoded codepoint ([`REPLACEMENT`] on invalid input).
    pub codepoint: u32,
}

/// Decodes the display unit starting at `buf[i]`.
///
/// Invalid or truncated sequences consume a single byte and decode as
/// U+FFFD; decoding never fails.
pub fn decode(buf: &[u8], i: usize) -> Glyph {
    let b = buf[i];
    if b < 0x80 {
        return Glyph {
            len: 1,
            width: width_of(b as u32),
            codepoint: b as u32,
        };
    }
    match decode_multibyte(buf, i) {
        Some((codepoint, len)) => Glyph {
            len,
            width: width_of(codepoint),
            codepoint,
        },
        None => Glyph {
            len: 1,
            width: width_of(REPLACEMENT),
            codepoint: REPLACEMENT,
        },
    }
}

/// Structural UTF-8 validation: continuation patterns, no overlong forms,
/// no surrogates, codepoints capped at U+10FFFF.
fn decode_multibyte(buf: &[u8], i: usize) -> Option<(u32, usize)> {
    let b0 = buf[i];
    let cont = |k: usize| -> Option<u32> {
        buf.get(i + k)
            .filter(|&&b| b & 0xC0 == 0x80)
            .map(|&b| (b & 0x3F) as u32)
    };

    match b0 {
        // 0xC0/0xC1 would be overlong two-byte forms.
        0xC2..=0xDF => {
            let b1 = cont(1)?;
            Some((((b0 as u32 & 0x1F) << 6) | b1, 2))
        }
        0xE0..=0xEF => {
            let b1 = *buf.get(i + 1)?;
            let valid = match b0 {
                0xE0 => (0xA0..=0xBF).contains(&b1), // overlong
                0xED => (0x80..=0x9F).contains(&b1), // surrogates
                _ => b1 & 0xC0 == 0x80,
            };
            if !valid {
                return None;
            }
            let b2 = cont(2)?;
            let cp = ((b0 as u32 & 0x0F) << 12) | ((b1 as u32 & 0x3F) << 6) | b2;
            Some((cp, 3))
        }
        0xF0..=0xF4 => {
            let b1 = *buf.get(i + 1)?;
            let valid = match b0 {
                0xF0 => (0x90..=0xBF).contains(&b1), // overlong
                0xF4 => (0x80..=0x8F).contains(&b1), // above U+10FFFF
                _ => b1 & 0xC0 == 0x80,
            };
            if !valid {
                return None;
            }
            let b2 = cont(2)?;
            let b3 = cont(3)?;
            let cp = ((b0 as u32 & 0x07) << 18)
                | ((b1 as u32 & 0x3F) << 12)
                | (b2 << 6)
                | b3;
            Some((cp, 4))
        }
        _ => None,
    }
}

/// Display width of a codepoint: 0 for controls and combining marks, 2 for
/// wide/double-width scripts, 1 otherwise.
pub fn width_of(cp: u32) -> usize {
    if cp < 0x20 || (0x7F..=0x9F).contains(&cp) {
        return 0;
    }
    if in_table(cp, COMBINING) {
        return 0;
    }
    if in_table(cp, WIDE) {
        return 2;
    }
    1
}

fn in_table(cp: u32, table: &[(u32, u32)]) -> bool {
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Zero-width combining marks and format controls. Sorted, inclusive ranges.
const COMBINING: &[(u32, u32)] = &[
    (0x0300, 0x036F),
    (0x0483, 0x0489),
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x05C1, 0x05C2),
    (0x05C4, 0x05C5),
    (0x05C7, 0x05C7),
    (0x0610, 0x061A),
    (0x064B, 0x065F),
    (0x0670, 0x0670),
    (0x06D6, 0x06DC),
    (0x06DF, 0x06E4),
    (0x06E7, 0x06E8),
    (0x06EA, 0x06ED),
    (0x0711, 0x0711),
    (0x0730, 0x074A),
    (0x07A6, 0x07B0),
    (0x07EB, 0x07F3),
    (0x0816, 0x0819),
    (0x081B, 0x0823),
    (0x0825, 0x0827),
    (0x0829, 0x082D),
    (0x0859, 0x085B),
    (0x08D4, 0x0902),
    (0x093A, 0x093A),
    (0x093C, 0x093C),
    (0x0941, 0x0948),
    (0x094D, 0x094D),
    (0x0951, 0x0957),
    (0x0962, 0x0963),
    (0x0981, 0x0981),
    (0x09BC, 0x09BC),
    (0x09C1, 0x09C4),
    (0x09CD, 0x09CD),
    (0x0A01, 0x0A02),
    (0x0A3C, 0x0A3C),
    (0x0A41, 0x0A42),
    (0x0A47, 0x0A48),
    (0x0A4B, 0x0A4D),
    (0x0B01, 0x0B01),
    (0x0C00, 0x0C00),
    (0x0D41, 0x0D44),
    (0x0E31, 0x0E31),
    (0x0E34, 0x0E3A),
    (0x0E47, 0x0E4E),
    (0x0EB1, 0x0EB1),
    (0x0EB4, 0x0EBC),
    (0x0EC8, 0x0ECD),
    (0x0F18, 0x0F19),
    (0x0F35, 0x0F35),
    (0x0F37, 0x0F37),
    (0x0F39, 0x0F39),
    (0x0F71, 0x0F7E),
    (0x0F80, 0x0F84),
    (0x0F86, 0x0F87),
    (0x102D, 0x1030),
    (0x1032, 0x1037),
    (0x1039, 0x103A),
    (0x1058, 0x1059),
    (0x1160, 0x11FF),
    (0x135D, 0x135F),
    (0x1712, 0x1714),
    (0x17B4, 0x17B5),
    (0x17B7, 0x17BD),
    (0x17C6, 0x17C6),
    (0x17C9, 0x17D3),
    (0x180B, 0x180D),
    (0x18A9, 0x18A9),
    (0x1920, 0x1922),
    (0x1A17, 0x1A18),
    (0x1AB0, 0x1ABE),
    (0x1B00, 0x1B03),
    (0x1DC0, 0x1DFF),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x20D0, 0x20F0),
    (0x2CEF, 0x2CF1),
    (0x2D7F, 0x2D7F),
    (0x2DE0, 0x2DFF),
    (0x302A, 0x302D),
    (0x3099, 0x309A),
    (0xA66F, 0xA672),
    (0xA8C4, 0xA8C5),
    (0xFB1E, 0xFB1E),
    (0xFE00, 0xFE0F),
    (0xFE20, 0xFE2F),
    (0xFEFF, 0xFEFF),
    (0x1D167, 0x1D169),
    (0x1D17B, 0x1D182),
    (0xE0100, 0xE01EF),
];

/// Double-width ranges: CJK blocks, Hangul syllables, fullwidth forms and
/// the supplementary ideographic planes. Sorted, inclusive.
const WIDE: &[(u32, u32)] = &[
    (0x1100, 0x115F),
    (0x2E80, 0x303E),
    (0x3041, 0x33FF),
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xA000, 0xA4CF),
    (0xA960, 0xA97F),
    (0xAC00, 0xD7A3),
    (0xF900, 0xFAFF),
    (0xFE10, 0xFE19),
    (0xFE30, 0xFE6F),
    (0xFF00, 0xFF60),
    (0xFFE0, 0xFFE6),
    (0x1B000, 0x1B001),
    (0x1F300, 0x1F64F),
    (0x1F900, 0x1F9FF),
    (0x20000, 0x2FFFD),
    (0x30000, 0x3FFFD),
];
