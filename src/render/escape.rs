//! Escape sequence transforms and scanning.
//!
//! Lines are preprocessed once, before the character loop, in exactly one of
//! three modes: strip (default), passthrough (`-c`) or textualize (`-e`).
//! Sequences are byte-oriented; input is not required to be valid UTF-8.
//!
//! Recognized syntax: CSI (`ESC [` up to a terminator in 0x40-0x7E) and OSC
//! (`ESC ]` up to BEL or ESC-backslash). Unterminated sequences are tolerated
//! everywhere by consuming to end of buffer.

use crate::config::EscapeMode;

/// The escape byte.
pub const ESC: u8 = 0x1B;

/// Literal spellings of the escape byte accepted in input text.
const MARKERS: &[&[u8]] = &[b"\\e", b"\\x1b", b"\\033"];

/// Applies the configured transform to one raw line.
pub fn apply(mode: EscapeMode, raw: &[u8]) -> Vec<u8> {
    match mode {
        EscapeMode::Strip => {
            let mut line = strip_sequences(raw);
            for marker in MARKERS {
                line = replace_all(&line, marker, b"");
            }
            line
        }
        EscapeMode::Passthrough => expand_markers(raw),
        EscapeMode::Textualize => textualize(&expand_markers(raw)),
    }
}

/// Converts the literal marker spellings into real escape bytes.
fn expand_markers(raw: &[u8]) -> Vec<u8> {
    let mut line = raw.to_vec();
    for marker in MARKERS {
        line = replace_all(&line, marker, &[ESC]);
    }
    line
}

fn replace_all(buf: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        if buf[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}

/// Index just past the escape sequence starting at `buf[start]` (which must
/// be [`ESC`]). An unterminated sequence consumes to the end of the buffer;
/// an unrecognized introducer consumes the escape byte plus one byte.
pub fn sequence_end(buf: &[u8], start: usize) -> usize {
    debug_assert_eq!(buf[start], ESC);
    let n = buf.len();
    let mut i = start + 1;
    if i >= n {
        return n;
    }
    match buf[i] {
        b'[' => {
            i += 1;
            while i < n {
                let c = buf[i];
                i += 1;
                if (0x40..=0x7E).contains(&c) {
                    break;
                }
            }
            i
        }
        b']' => {
            i += 1;
            while i < n {
                if buf[i] == 0x07 {
                    return i + 1;
                }
                if buf[i] == ESC && i + 1 < n && buf[i + 1] == b'\\' {
                    return i + 2;
                }
                i += 1;
            }
            n
        }
        _ => i + 1,
    }
}

/// Removes all real CSI/OSC sequences (and lone escape introducers).
fn strip_sequences(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        if buf[i] == ESC {
            i = sequence_end(buf, i);
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}

/// Re-serializes real escape sequences as text: `\e[` + CSI body, or `\e]` +
/// OSC body with a `<TERM>` suffix when a valid terminator was present. A
/// trailing escape byte renders as a literal `\e`; an unknown introducer as
/// `\e` plus that byte.
fn textualize(buf: &[u8]) -> Vec<u8> {
    let n = buf.len();
    let mut out = Vec::with_capacity(n * 2);
    let mut i = 0;
    while i < n {
        if buf[i] != ESC {
            out.push(buf[i]);
            i += 1;
            continue;
        }
        if i + 1 >= n {
            out.extend_from_slice(b"\\e");
            i += 1;
            continue;
        }
        match buf[i + 1] {
            b'[' => {
                out.extend_from_slice(b"\\e[");
                let mut j = i + 2;
                while j < n {
                    let c = buf[j];
                    j += 1;
                    out.push(c);
                    if (0x40..=0x7E).contains(&c) {
                        break;
                    }
                }
                i = j;
            }
            b']' => {
                out.extend_from_slice(b"\\e]");
                let mut j = i + 2;
                let mut terminated = false;
                while j < n {
                    let c = buf[j];
                    j += 1;
                    if c == 0x07 {
                        terminated = true;
                        break;
                    }
                    if c == ESC && j < n && buf[j] == b'\\' {
                        terminated = true;
                        j += 1;
                        break;
                    }
                    out.push(c);
                }
                if terminated {
                    out.extend_from_slice(b"<TERM>");
                }
                i = j;
            }
            other => {
                out.extend_from_slice(b"\\e");
                out.push(other);
                i += 2;
            }
        }
    }
    out
}

/// Drops a dangling, unterminated escape sequence from the end of a rendered
/// buffer so it is never flushed incomplete. Complete sequences are left
/// intact.
pub fn sanitize_trailing(buf: &mut Vec<u8>) {
    let Some(pos) = buf.iter().rposition(|&b| b == ESC) else {
        return;
    };
    let n = buf.len();
    if pos + 1 >= n {
        buf.truncate(pos);
        return;
    }
    match buf[pos + 1] {
        b'[' => {
            let terminated = buf[pos + 2..].iter().any(|&c| (0x40..=0x7E).contains(&c));
            if !terminated {
                buf.truncate(pos);
            }
        }
        b']' => {
            // pos is the last escape byte, so only BEL can terminate here.
            let terminated = buf[pos + 2..].contains(&0x07);
            if !terminated {
                buf.truncate(pos);
            }
        }
        _ => {}
    }
}
