//! Simulated typing mistakes.
//!
//! A mistake shows a neighboring key from a fixed physical-keyboard
//! adjacency table before the correct character. The renderer owns the
//! dwell/erase choreography; this module only decides and picks.

use rand::Rng;

/// Physical keyboard neighbors, keyed by the lowercase form.
const NEIGHBORS: &[(char, &str)] = &[
    ('a', "qwsz"),
    ('b', "vghn"),
    ('c', "xdfv"),
    ('d', "ersfcx"),
    ('e', "wsdr"),
    ('f', "drtgvc"),
    ('g', "ftyhbv"),
    ('h', "gyujnb"),
    ('i', "ujko"),
    ('j', "huikmn"),
    ('k', "jiolm"),
    ('l', "kop"),
    ('m', "njk"),
    ('n', "bhjm"),
    ('o', "iklp"),
    ('p', "ol"),
    ('q', "wa"),
    ('r', "edft"),
    ('s', "awedxz"),
    ('t', "rfgy"),
    ('u', "yhji"),
    ('v', "cfgb"),
    ('w', "qase"),
    ('x', "zsdc"),
    ('y', "tghu"),
    ('z', "asx"),
    ('1', "2q"),
    ('2', "13w"),
    ('3', "24e"),
    ('4', "35r"),
    ('5', "46t"),
    ('6', "57y"),
    ('7', "68u"),
    ('8', "79i"),
    ('9', "80o"),
    ('0', "9p"),
    (',', "m.<>"),
    ('.', ">,/l"),
    ('/', ".?;"),
    ('\\', "|"),
    ('|', "\\"),
    (';', "lk'"),
    (':', "L\""),
    ('\'', ";\""),
    ('"', ";'"),
    ('[', "p-]=\\;"),
    (']', "[\\'"),
    ('{', "P_+}]"),
    ('}', "[{\\|"),
    ('=', "+-"),
    ('+', "=-"),
    ('-', "=_"),
    ('_', "-"),
    ('(', "9"),
    (')', "0"),
    ('*', "8"),
    ('&', "67"),
    ('^', "45"),
    ('%', "45"),
    ('$', "34"),
    ('#', "23"),
    ('@', "12"),
    ('!', "12"),
    ('~', "`"),
    ('`', "~"),
];

/// Whether a byte can receive a mistake: single-byte characters only, never
/// whitespace.
pub fn eligible(b: u8) -> bool {
    b < 0x80 && !matches!(b, b'\t' | b'\n' | b' ')
}

/// Draws 1-100 against the configured chance.
pub fn roll(rng: &mut impl Rng, chance: u8) -> bool {
    if chance == 0 {
        return false;
    }
    rng.gen_range(1..=100u32) <= chance as u32
}

/// Picks a wrong neighboring key for `ch`, re-applying the original case.
/// Characters without an adjacency entry pass through unchanged.
pub fn neighbor_of(rng: &mut impl Rng, ch: char) -> char {
    let lower = ch.to_ascii_lowercase();
    match NEIGHBORS.iter().find(|&&(key, _)| key == lower) {
        Some((_, set)) => {
            let set = set.as_bytes();
            let wrong = set[rng.gen_range(0..set.len())] as char;
            if ch.is_ascii_uppercase() {
                wrong.to_ascii_uppercase()
            } else {
                wrong
            }
        }
        None => ch,
    }
}
