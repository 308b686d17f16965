use crate::session::error::SessionError;
use crate::session::path::{sanitize_segment, SessionPath};

#[test]
fn test_parse_sessions_and_groups() -> Result<(), SessionError> {
    let session = SessionPath::parse("Work#Server1")?;
    assert!(session.is_session());
    assert_eq!(session.leaf_name(), "Server1");
    assert_eq!(session.depth(), 2);

    let group = SessionPath::parse("Work#Sub#")?;
    assert!(group.is_group());
    assert_eq!(group.leaf_name(), "Sub");
    assert_eq!(group.segments().collect::<Vec<_>>(), vec!["Work", "Sub"]);
    Ok(())
}

#[test]
fn test_parse_rejects_bad_paths() {
    for bad in ["", "#", "a##b", "#a", "a#..#b", ".", "a\0b"] {
        assert!(
            matches!(SessionPath::parse(bad), Err(SessionError::InvalidPath { .. })),
            "'{}' should be rejected",
            bad.escape_debug()
        );
    }
    assert!(SessionPath::parse("host.example.com").is_ok());
}

#[test]
fn test_delimiter_is_substituted_in_segments() -> Result<(), SessionError> {
    assert_eq!(sanitize_segment("a#b"), "a_b");
    let group = SessionPath::group("Team#A")?;
    assert_eq!(group.as_str(), "Team_A#");
    let child = group.child("db#1")?;
    assert_eq!(child.as_str(), "Team_A#db_1");
    let path = SessionPath::from_segments(&["x", "y#z"], false)?;
    assert_eq!(path.as_str(), "x#y_z");
    Ok(())
}

#[test]
fn test_parent_and_children() -> Result<(), SessionError> {
    let path = SessionPath::parse("Work#Sub#db")?;
    let parent = path.parent().expect("parent");
    assert_eq!(parent.as_str(), "Work#Sub#");
    assert_eq!(parent.parent().expect("grandparent").as_str(), "Work#");
    assert_eq!(SessionPath::parse("Home")?.parent(), None);
    assert_eq!(SessionPath::parse("Work#")?.parent(), None);

    let group = SessionPath::parse("Work#")?;
    assert_eq!(group.child_group("Sub")?.as_str(), "Work#Sub#");
    assert!(matches!(
        SessionPath::parse("Home")?.child("x"),
        Err(SessionError::NotAGroup { .. })
    ));
    Ok(())
}

#[test]
fn test_rebase() -> Result<(), SessionError> {
    let from = SessionPath::parse("Work#")?;
    let to = SessionPath::parse("Archive#Old#")?;
    let path = SessionPath::parse("Work#Sub#db")?;

    assert!(path.starts_with(&from));
    assert_eq!(path.rebase(Some(&from), Some(&to))?.as_str(), "Archive#Old#Sub#db");
    assert_eq!(path.rebase(Some(&from), None)?.as_str(), "Sub#db");
    assert_eq!(SessionPath::parse("Home")?.rebase(None, Some(&to))?.as_str(), "Archive#Old#Home");
    assert!(path.rebase(Some(&to), None).is_err());
    Ok(())
}

#[test]
fn test_ordering_follows_sessioncmp() -> Result<(), SessionError> {
    let mut paths: Vec<SessionPath> = ["Work#a", "Default Settings", "Android Devices#x", "Home"]
        .iter()
        .map(|s| SessionPath::parse(s))
        .collect::<Result<_, _>>()?;
    paths.sort();
    let names: Vec<&str> = paths.iter().map(SessionPath::as_str).collect();
    assert_eq!(names, vec!["Default Settings", "Android Devices#x", "Home", "Work#a"]);
    Ok(())
}
