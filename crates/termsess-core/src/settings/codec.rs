//! Map/List codec: packs an ordered string map into one scalar value.
//!
//! Entries are comma separated `key=value` pairs (or bare `key` when values
//! are suppressed; an empty key is then written as a lone `=`). `=`, `,` and
//! `\` are backslash escaped inside both key and value. Parsing splits on
//! unescaped commas and the first unescaped `=`; an entry without `=` maps to
//! the empty string.
use crate::settings::conf::ConfMap;

const ESCAPE: char = '\\';

/// Escape one key or value
pub fn escape_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '=' | ',' | ESCAPE) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// Serialize a map. With `include_values` false only the keys are written.
pub fn serialize_map(map: &ConfMap, include_values: bool) -> String {
    serialize_entries(
        map.iter()
            .map(|(k, v)| (k.as_str(), include_values.then_some(v.as_str()))),
    )
}

fn serialize_entries<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut out = String::new();
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_component(key));
        match value {
            Some(value) => {
                out.push('=');
                out.push_str(&escape_component(value));
            }
            // A bare empty key would vanish; `=` reads back as ("", "")
            None if key.is_empty() => out.push('='),
            None => {}
        }
    }
    out
}

/// Parse a serialized map. Later duplicates of a key replace earlier ones.
pub fn parse_map(text: &str) -> ConfMap {
    let mut map = ConfMap::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => {
                // A trailing escape has nothing to protect and is kept as is
                let literal = chars.next().unwrap_or(ESCAPE);
                if in_value {
                    value.push(literal);
                } else {
                    key.push(literal);
                }
            }
            ',' => {
                if in_value || !key.is_empty() {
                    map.insert(std::mem::take(&mut key), std::mem::take(&mut value));
                }
                key.clear();
                value.clear();
                in_value = false;
            }
            '=' if !in_value => in_value = true,
            _ => {
                if in_value {
                    value.push(ch);
                } else {
                    key.push(ch);
                }
            }
        }
    }
    if in_value || !key.is_empty() {
        map.insert(key, value);
    }
    map
}

/// Value paired with an `L`-type key for a dynamic forwarding in memory
pub const DYNAMIC_FORWARD: &str = "D";

/// Position of the type letter in a forwarding key, after an optional
/// address-family prefix (`4` or `6`)
fn type_letter_index(key: &str) -> usize {
    match key.as_bytes().first() {
        Some(b'4') | Some(b'6') => 1,
        _ => 0,
    }
}

fn replace_type_letter(key: &str, index: usize, letter: char) -> String {
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..index]);
    out.push(letter);
    out.push_str(&key[index + 1..]);
    out
}

/// Translate a stored forwarding entry into its in-memory shape.
///
/// Legacy records tag dynamic forwardings with a `D` type letter; in memory
/// they are an `L` key paired with the value `"D"`.
pub fn legacy_portfwd_decode(key: &str, value: &str) -> (String, String) {
    let index = type_letter_index(key);
    if key.as_bytes().get(index) == Some(&b'D') {
        (replace_type_letter(key, index, 'L'), DYNAMIC_FORWARD.to_string())
    } else {
        (key.to_string(), value.to_string())
    }
}

/// Translate an in-memory forwarding entry back to the stored shape.
/// The inverse of [`legacy_portfwd_decode`].
pub fn legacy_portfwd_encode(key: &str, value: &str) -> (String, String) {
    let index = type_letter_index(key);
    if key.as_bytes().get(index) == Some(&b'L') && value == DYNAMIC_FORWARD {
        (replace_type_letter(key, index, 'D'), String::new())
    } else {
        (key.to_string(), value.to_string())
    }
}

/// Serialize a port forwarding map, writing dynamic forwardings as bare
/// `D` keys
pub fn serialize_portfwd_map(map: &ConfMap) -> String {
    let encoded: Vec<(String, String, bool)> = map
        .iter()
        .map(|(k, v)| {
            let (key, value) = legacy_portfwd_encode(k, v);
            let bare = key != *k;
            (key, value, bare)
        })
        .collect();
    serialize_entries(
        encoded
            .iter()
            .map(|(k, v, bare)| (k.as_str(), (!bare).then_some(v.as_str()))),
    )
}

/// Parse a port forwarding map, translating legacy dynamic entries
pub fn parse_portfwd_map(text: &str) -> ConfMap {
    parse_map(text)
        .into_iter()
        .map(|(k, v)| legacy_portfwd_decode(&k, &v))
        .collect()
}
