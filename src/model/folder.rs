//! Module `folder`
//!
//! Defines the `Folder` value type: an ordered list of path segments that
//! identifies a folder inside an (application, perimeter) namespace.

use std::fmt;
use std::str::FromStr;

/// An immutable folder path.
///
/// Identity is the segment sequence, not the rendered string: `"a/b"` and
/// `"a\\b"` parse to the same folder, while `"/a"` (leading empty segment)
/// and `"a"` are different folders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Folder {
    segments: Vec<String>,
}

impl Folder {
    /// Builds a folder from already split segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a path, splitting on both `/` and `\`.
    ///
    /// Trailing empty segments are dropped, leading ones are kept.
    pub fn parse(path: &str) -> Self {
        if !path.contains(['/', '\\']) {
            return Self::new([path]);
        }

        let mut segments: Vec<String> = path.split(['/', '\\']).map(str::to_string).collect();
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        Self { segments }
    }

    /// Returns a new folder nested below `self`.
    pub fn child<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = self.segments.clone();
        all.extend(segments.into_iter().map(Into::into));
        Self { segments: all }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Folder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Folder::parse(s))
    }
}

impl From<&str> for Folder {
    fn from(path: &str) -> Self {
        Folder::parse(path)
    }
}
