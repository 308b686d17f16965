use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::kernel::constants::{DELIMITER_SUBSTITUTE, PATH_DELIMITER};
use crate::session::error::SessionError;
use crate::session::namespace::sessioncmp;

/// A validated position in the session namespace.
///
/// Segments are joined with `#`. A path ending in `#` names a group, any
/// other path names a session. Ordering follows [`sessioncmp`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionPath(String);

impl SessionPath {
    /// Validate a full path such as `Work#Server1` or `Work#`
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        if text.is_empty() {
            return Err(SessionError::invalid_path(text, "path is empty"));
        }
        if text.contains('\0') {
            return Err(SessionError::invalid_path(
                text.replace('\0', "\\0"),
                "path contains NUL",
            ));
        }
        let body = text.strip_suffix(PATH_DELIMITER).unwrap_or(text);
        for segment in body.split(PATH_DELIMITER) {
            check_segment(text, segment)?;
        }
        Ok(Self(text.to_string()))
    }

    /// A top-level session. Delimiters in `name` are substituted.
    pub fn session(name: &str) -> Result<Self, SessionError> {
        Self::parse(&sanitize_segment(name))
    }

    /// A top-level group. Delimiters in `name` are substituted.
    pub fn group(name: &str) -> Result<Self, SessionError> {
        Self::parse(&format!("{}{}", sanitize_segment(name), PATH_DELIMITER))
    }

    /// Build a path from segments; the last one is a group when `group` is set
    pub fn from_segments<S: AsRef<str>>(segments: &[S], group: bool) -> Result<Self, SessionError> {
        let mut text = segments
            .iter()
            .map(|s| sanitize_segment(s.as_ref()))
            .collect::<Vec<_>>()
            .join(&PATH_DELIMITER.to_string());
        if group {
            text.push(PATH_DELIMITER);
        }
        Self::parse(&text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_group(&self) -> bool {
        self.0.ends_with(PATH_DELIMITER)
    }

    pub fn is_session(&self) -> bool {
        !self.is_group()
    }

    /// Segments without the trailing group delimiter
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let body = self.0.strip_suffix(PATH_DELIMITER).unwrap_or(&self.0);
        body.split(PATH_DELIMITER)
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment, without the group delimiter
    pub fn leaf_name(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    /// The enclosing group, or `None` at the top level
    pub fn parent(&self) -> Option<SessionPath> {
        let body = self.0.strip_suffix(PATH_DELIMITER).unwrap_or(&self.0);
        body.rfind(PATH_DELIMITER)
            .map(|i| SessionPath(body[..=i].to_string()))
    }

    /// A session inside this group
    pub fn child(&self, name: &str) -> Result<SessionPath, SessionError> {
        self.require_group()?;
        Self::parse(&format!("{}{}", self.0, sanitize_segment(name)))
    }

    /// A subgroup inside this group
    pub fn child_group(&self, name: &str) -> Result<SessionPath, SessionError> {
        self.require_group()?;
        Self::parse(&format!(
            "{}{}{}",
            self.0,
            sanitize_segment(name),
            PATH_DELIMITER
        ))
    }

    /// True when this path lies inside `group` (or is the group itself)
    pub fn starts_with(&self, group: &SessionPath) -> bool {
        group.is_group() && self.0.starts_with(&group.0)
    }

    /// Move this path from under `from` to under `to`. `None` stands for
    /// the top level.
    pub fn rebase(
        &self,
        from: Option<&SessionPath>,
        to: Option<&SessionPath>,
    ) -> Result<SessionPath, SessionError> {
        let suffix = match from {
            Some(group) if self.starts_with(group) => &self.0[group.0.len()..],
            Some(group) => {
                return Err(SessionError::invalid_path(
                    &self.0,
                    format!("not inside group '{}'", group),
                ))
            }
            None => self.0.as_str(),
        };
        let prefix = to.map(SessionPath::as_str).unwrap_or_default();
        Self::parse(&format!("{}{}", prefix, suffix))
    }

    fn require_group(&self) -> Result<(), SessionError> {
        if self.is_group() {
            Ok(())
        } else {
            Err(SessionError::NotAGroup {
                path: self.0.clone(),
            })
        }
    }
}

fn check_segment(path: &str, segment: &str) -> Result<(), SessionError> {
    if segment.is_empty() {
        return Err(SessionError::invalid_path(path, "empty segment"));
    }
    if segment == "." || segment == ".." {
        return Err(SessionError::invalid_path(
            path,
            format!("'{}' is not a valid segment", segment),
        ));
    }
    Ok(())
}

/// Replace path delimiters in a user-supplied segment name
pub fn sanitize_segment(name: &str) -> String {
    name.replace(PATH_DELIMITER, &DELIMITER_SUBSTITUTE.to_string())
}

impl fmt::Display for SessionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionPath {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for SessionPath {
    fn cmp(&self, other: &Self) -> Ordering {
        sessioncmp(&self.0, &other.0)
    }
}

impl PartialOrd for SessionPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
