//! Common character sets, ready for
//! [`Chartable::ascii_from_charset`](crate::Chartable::ascii_from_charset) or
//! [`CharSet::new`](crate::CharSet::new).

/// `0` through `9`.
pub const ASCII_DIGITS: &str = "0123456789";
/// `A` through `Z`.
pub const ASCII_UPPERCASE_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// `a` through `z`.
pub const ASCII_LOWERCASE_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
/// All ASCII letters.
pub const ASCII_LETTERS: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz"
);
/// All ASCII digits and letters.
pub const ASCII_ALPHANUMERIC: &str = concat!(
    "0123456789",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz"
);
/// Tab, line feed, vertical tab, form feed, carriage return and space.
pub const ASCII_WHITESPACE: &str = "\t\n\u{0B}\u{0C}\r ";
/// Whitespace insignificant in JSON: tab, line feed, carriage return, space.
pub const JSON_WHITESPACE: &str = "\t\n\r ";
/// Space through tilde.
pub const ASCII_PRINTABLE: &str = concat!(
    " !\"#$%&'()*+,-./0123456789:;<=>?@",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`",
    "abcdefghijklmnopqrstuvwxyz{|}~",
);
