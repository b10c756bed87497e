//! Validation of the tile sub-path and query forwarded by the resource proxy.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathRejection {
    #[error("resource path is empty")]
    Empty,

    #[error("resource path contains a dot segment")]
    DotSegment,

    #[error("resource path contains an illegal character")]
    IllegalCharacter,
}

/// Already percent-decoded sub-path below the tile host, split into
/// segments. Empty segments (`a//b`) are dropped; `.`/`..` are refused so
/// the request cannot climb out of the configured prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePath(Vec<String>);

impl TilePath {
    pub fn parse(raw: &str) -> Result<Self, PathRejection> {
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            if segment.is_empty() {
                continue;
            }
            if segment == "." || segment == ".." {
                return Err(PathRejection::DotSegment);
            }
            if segment.chars().any(|c| c == '\\' || c.is_control()) {
                return Err(PathRejection::IllegalCharacter);
            }
            segments.push(segment.to_string());
        }

        if segments.is_empty() {
            return Err(PathRejection::Empty);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Client query parameters minus any attempt to supply `apikey`; the key
/// from the session is the only one ever sent.
pub fn forwarded_query(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("apikey"))
        .collect()
}
