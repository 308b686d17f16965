use rand::Rng;

use crate::storage::naming::{escape_field, escape_name, unescape};

#[test]
fn test_escape_name_unsafe_characters() {
    assert_eq!(escape_name("Work#Server 1"), "Work#Server%201");
    assert_eq!(escape_name("a/b\\c:d"), "a%2Fb%5Cc%3Ad");
    assert_eq!(escape_name(".hidden"), "%2Ehidden");
    assert_eq!(escape_name("a.b"), "a.b");
    assert_eq!(escape_name("100%"), "100%25");
}

#[test]
fn test_escape_field_keeps_name_characters() {
    assert_eq!(escape_field("a b/c"), "a b/c");
    assert_eq!(escape_field("a\\b"), "a%5Cb");
    assert_eq!(escape_field("line\nbreak"), "line%0Abreak");
}

#[test]
fn test_unescape_keeps_stray_percent() {
    assert_eq!(unescape("50%"), "50%");
    assert_eq!(unescape("%zz"), "%zz");
    assert_eq!(unescape("%4"), "%4");
    assert_eq!(unescape("%41"), "A");
}

#[test]
fn test_escape_roundtrip_random_names() {
    let mut rng = rand::thread_rng();
    let alphabet: Vec<char> = " \\/:*?\"<>|%.#=,abcXYZ019\t\u{e9}\u{4e2d}".chars().collect();
    for _ in 0..200 {
        let len = rng.gen_range(0..24);
        let name: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        assert_eq!(unescape(&escape_name(&name)), name);
        assert_eq!(unescape(&escape_field(&name)), name);
    }
}
