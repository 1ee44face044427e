//! The six special code points and escaping.

/// Field delimiter `¦` (U+00A6).
pub const FIELD_DELIM: char = '\u{00A6}';
/// Object start `‹` (U+2039).
pub const OBJECT_START: char = '\u{2039}';
/// Object end `›` (U+203A).
pub const OBJECT_END: char = '\u{203A}';
/// Array start `«` (U+00AB).
pub const ARRAY_START: char = '\u{00AB}';
/// Array end `»` (U+00BB).
pub const ARRAY_END: char = '\u{00BB}';
/// Enum alternative `|` (U+007C).
pub const ENUM_PIPE: char = '\u{007C}';
/// Escape `⁊` (U+204A).
pub const ESCAPE: char = '\u{204A}';

/// Is `c` one of the six code points with structural meaning?
pub fn is_special(c: char) -> bool {
    matches!(
        c,
        FIELD_DELIM | OBJECT_START | OBJECT_END | ARRAY_START | ARRAY_END | ENUM_PIPE | ESCAPE
    )
}

/// Prefix every special code point in `s` with the escape code point.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if is_special(c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Undo [`escape`]: drop each escape code point and copy the following code
/// point verbatim. A lone escape at end-of-input is kept as literal content.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ESCAPE),
            }
        } else {
            out.push(c);
        }
    }
    out
}
