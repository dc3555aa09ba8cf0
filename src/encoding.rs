//! Percent-decoding of matched values and percent-encoding of assembled ones.
//!
//! Decoding turns every `%XX` escape into its raw byte. Encoding leaves the
//! RFC 3986 unreserved set alone, plus the sub-delimiters and `:`/`@` that a
//! path segment may carry verbatim; everything else is escaped, so `#`, `%`,
//! `/` and `?` always come out encoded.

use std::borrow::Cow;

/// Escapes produced by `urlencoding::encode` that are legal inside a path
/// segment and are restored to their literal character.
const PATH_SAFE: [(&str, &str); 13] = [
    ("%21", "!"),
    ("%24", "$"),
    ("%26", "&"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
    ("%2B", "+"),
    ("%2C", ","),
    ("%3A", ":"),
    ("%3B", ";"),
    ("%3D", "="),
    ("%40", "@"),
];

/// Decode all `%XX` escapes in `raw`. Invalid UTF-8 is replaced lossily.
#[must_use]
pub fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

/// Encode a single path segment value.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    let encoded = urlencoding::encode(value);
    if !encoded.contains('%') {
        return encoded.into_owned();
    }
    // every '%' in `encoded` starts a three-character escape, so a plain
    // substring replace cannot split one
    let mut out = encoded.into_owned();
    for (escape, raw) in PATH_SAFE {
        if out.contains(escape) {
            out = out.replace(escape, raw);
        }
    }
    out
}

/// Encode a value that may span several segments, keeping `/` separators.
#[must_use]
pub fn encode_path(value: &str) -> String {
    value
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
