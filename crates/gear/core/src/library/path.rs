use super::LibraryError;

/// Address of a set in the library: a category plus an ordered qualifier chain.
///
/// Written as a dotted string, e.g. `midcast.Sleeps.MaxDuration`. Segments are
/// case-sensitive and may not be empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetPath {
    segments: Vec<String>,
}

impl SetPath {
    /// Parses a dotted path.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidPath` for an empty path or an empty
    /// segment (`"idle..PDT"`).
    pub fn parse(raw: &str) -> Result<Self, LibraryError> {
        let segments: Vec<String> = raw.split('.').map(str::trim).map(String::from).collect();
        if segments.iter().any(String::is_empty) {
            return Err(LibraryError::InvalidPath {
                path: raw.to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Returns this path refined by one more qualifier.
    #[must_use]
    pub fn child(&self, qualifier: &str) -> SetPath {
        let mut segments = self.segments.clone();
        segments.push(qualifier.to_string());
        SetPath { segments }
    }

    /// Returns the path without its last qualifier, if it has one.
    pub fn parent(&self) -> Option<SetPath> {
        (self.segments.len() > 1).then(|| SetPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Number of segments (category plus qualifiers).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl core::str::FromStr for SetPath {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetPath::parse(s)
    }
}

impl core::fmt::Display for SetPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
