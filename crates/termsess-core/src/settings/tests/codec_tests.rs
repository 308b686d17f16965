use rand::Rng;

use crate::settings::codec::{
    legacy_portfwd_decode, legacy_portfwd_encode, parse_map, parse_portfwd_map, serialize_map,
    serialize_portfwd_map,
};
use crate::settings::conf::ConfMap;

fn map(entries: &[(&str, &str)]) -> ConfMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_serialize_escapes_reserved_characters() {
    let m = map(&[("a=b", "c,d"), ("e\\f", "g")]);
    assert_eq!(serialize_map(&m, true), "a\\=b=c\\,d,e\\\\f=g");
}

#[test]
fn test_serialize_keys_only() {
    let m = map(&[("host1", "ignored"), ("host2", "")]);
    assert_eq!(serialize_map(&m, false), "host1,host2");
}

#[test]
fn test_keys_only_keeps_empty_key() {
    let m = map(&[("", "")]);
    assert_eq!(serialize_map(&m, false), "=");
    assert_eq!(parse_map(&serialize_map(&m, false)), m);

    let m = map(&[("a", ""), ("", "")]);
    assert_eq!(serialize_map(&m, false), "=,a");
    assert_eq!(parse_map(&serialize_map(&m, false)), m);
}

#[test]
fn test_parse_splits_on_first_unescaped_equals() {
    let parsed = parse_map("PATH=/bin=x,TERM=xterm");
    assert_eq!(parsed, map(&[("PATH", "/bin=x"), ("TERM", "xterm")]));
}

#[test]
fn test_parse_entry_without_value_maps_to_empty() {
    let parsed = parse_map("alpha,beta=1");
    assert_eq!(parsed, map(&[("alpha", ""), ("beta", "1")]));
}

#[test]
fn test_parse_empty_text_is_empty_map() {
    assert!(parse_map("").is_empty());
    assert_eq!(serialize_map(&ConfMap::new(), true), "");
}

#[test]
fn test_parse_last_duplicate_wins() {
    assert_eq!(parse_map("k=1,k=2"), map(&[("k", "2")]));
}

#[test]
fn test_roundtrip_random_maps() {
    let mut rng = rand::thread_rng();
    let alphabet: Vec<char> = "=,\\ab:# ".chars().collect();
    let word = |rng: &mut rand::rngs::ThreadRng, min: usize| -> String {
        let len = rng.gen_range(min..8);
        (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect()
    };
    for _ in 0..200 {
        let mut m = ConfMap::new();
        for _ in 0..rng.gen_range(0..5) {
            let key = word(&mut rng, 1);
            let value = word(&mut rng, 0);
            m.insert(key, value);
        }
        assert_eq!(parse_map(&serialize_map(&m, true)), m);
    }
}

#[test]
fn test_legacy_dynamic_forward_decode() {
    assert_eq!(
        legacy_portfwd_decode("D8080", ""),
        ("L8080".to_string(), "D".to_string())
    );
    assert_eq!(
        legacy_portfwd_decode("4D1080", ""),
        ("4L1080".to_string(), "D".to_string())
    );
    assert_eq!(
        legacy_portfwd_decode("L3000", "localhost:3000"),
        ("L3000".to_string(), "localhost:3000".to_string())
    );
}

#[test]
fn test_legacy_dynamic_forward_encode() {
    assert_eq!(
        legacy_portfwd_encode("L8080", "D"),
        ("D8080".to_string(), String::new())
    );
    assert_eq!(
        legacy_portfwd_encode("6L1080", "D"),
        ("6D1080".to_string(), String::new())
    );
    assert_eq!(
        legacy_portfwd_encode("R22", "D"),
        ("R22".to_string(), "D".to_string())
    );
}

#[test]
fn test_portfwd_map_roundtrip() {
    let stored = "D1080,L3000=localhost:3000,R2222=host:22";
    let parsed = parse_portfwd_map(stored);
    assert_eq!(
        parsed,
        map(&[
            ("L1080", "D"),
            ("L3000", "localhost:3000"),
            ("R2222", "host:22")
        ])
    );
    let written = serialize_portfwd_map(&parsed);
    assert_eq!(parse_portfwd_map(&written), parsed);
    assert!(written.contains("D1080"));
    assert!(!written.contains("D1080="));
}
