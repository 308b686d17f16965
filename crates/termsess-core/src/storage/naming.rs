//! Escaping used when collection names and values have to live in places
//! with a restricted alphabet (file names, line-oriented record files).
//!
//! Unsafe bytes are written as `%XX`. Unescaping accepts any text, so a
//! stray `%` that is not followed by two hex digits is kept literally.

const NAME_UNSAFE: &[u8] = b" \\/:*?\"<>|%";
const FIELD_UNSAFE: &[u8] = b"\\%";

/// Escape a collection name so it can be used as a single file name
pub fn escape_name(name: &str) -> String {
    escape(name, NAME_UNSAFE, true)
}

/// Escape a key or value for a `key\value\` record line
pub fn escape_field(text: &str) -> String {
    escape(text, FIELD_UNSAFE, false)
}

/// Reverse [`escape_name`] or [`escape_field`]
pub fn unescape(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn escape(text: &str, unsafe_bytes: &[u8], escape_leading_dot: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        let escaped = ch.is_ascii()
            && (ch < ' '
                || ch == '\x7f'
                || unsafe_bytes.contains(&(ch as u8))
                || (escape_leading_dot && i == 0 && ch == '.'));
        if escaped {
            out.push_str(&format!("%{:02X}", ch as u8));
        } else {
            out.push(ch);
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
