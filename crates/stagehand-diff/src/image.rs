//! Image diffs: two source addresses and a change state, no fetching.

use std::fmt::Write;

use serde::Serialize;

/// Which side of the change an image source shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageVersion {
    Previous,
    Current,
}

impl ImageVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Current => "current",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDiffState {
    New,
    Removed,
    Changed,
}

impl ImageDiffState {
    /// A new file wins over a removed one.
    pub fn from_flags(is_new: bool, removed: bool) -> Self {
        if is_new {
            Self::New
        } else if removed {
            Self::Removed
        } else {
            Self::Changed
        }
    }
}

/// Where image versions are served from for one repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEndpoint {
    base: String,
    repo_path: String,
}

impl ImageEndpoint {
    pub fn new(base: impl Into<String>, repo_path: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// The address of one version of `filename`.
    ///
    /// The repository path is percent-encoded; the file name is passed as-is.
    pub fn source(&self, filename: &str, version: ImageVersion) -> String {
        format!(
            "{}?path={}&filename={}&version={}",
            self.base,
            encode_component(&self.repo_path),
            filename,
            version.as_str()
        )
    }
}

/// Both sources of an image diff plus its state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageDiff {
    pub state: ImageDiffState,
    pub previous_src: String,
    pub current_src: String,
}

impl ImageDiff {
    pub fn new(endpoint: &ImageEndpoint, filename: &str, is_new: bool, removed: bool) -> Self {
        Self {
            state: ImageDiffState::from_flags(is_new, removed),
            previous_src: endpoint.source(filename, ImageVersion::Previous),
            current_src: endpoint.source(filename, ImageVersion::Current),
        }
    }
}

/// Percent-encode everything except unreserved URI characters and
/// `!*'()~`, matching how browsers encode a single query component.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_flags() {
        assert_eq!(ImageDiffState::from_flags(true, false), ImageDiffState::New);
        assert_eq!(ImageDiffState::from_flags(false, true), ImageDiffState::Removed);
        assert_eq!(ImageDiffState::from_flags(false, false), ImageDiffState::Changed);
        assert_eq!(ImageDiffState::from_flags(true, true), ImageDiffState::New);
    }

    #[test]
    fn sources_are_deterministic() {
        let endpoint = ImageEndpoint::new("/api/diff/image", "/home/me/my repo");
        let diff = ImageDiff::new(&endpoint, "img/logo.png", false, false);
        assert_eq!(
            diff.previous_src,
            "/api/diff/image?path=%2Fhome%2Fme%2Fmy%20repo&filename=img/logo.png&version=previous"
        );
        assert_eq!(
            diff.current_src,
            "/api/diff/image?path=%2Fhome%2Fme%2Fmy%20repo&filename=img/logo.png&version=current"
        );
        assert_eq!(diff, ImageDiff::new(&endpoint, "img/logo.png", false, false));
    }

    #[test]
    fn encode_component_handles_utf8() {
        assert_eq!(encode_component("a-b_c.d"), "a-b_c.d");
        assert_eq!(encode_component("C:\\x"), "C%3A%5Cx");
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
