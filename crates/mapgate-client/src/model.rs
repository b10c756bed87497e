use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Initial map view (Dubai area).
pub const INITIAL_LOCATION: Location = Location {
    center: [25.229762, 55.289311],
    zoom: 9.0,
};

/// Zoom applied after a suggestion resolves.
pub const RESOLVED_ZOOM: f64 = 15.0;

/// Map view. `center` is `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for Location {
    fn default() -> Self {
        INITIAL_LOCATION
    }
}

/// One entry of a suggest response. Fields the UI does not use are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub uri: Option<String>,
    pub title: SuggestionTitle,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestionTitle {
    Plain(String),
    Rich {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl Suggestion {
    pub fn label(&self) -> &str {
        match &self.title {
            SuggestionTitle::Plain(text) => text,
            SuggestionTitle::Rich { text, .. } => text,
        }
    }

    /// Only suggestions carrying a `uri` can be geocoded.
    pub fn is_selectable(&self) -> bool {
        self.uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }
}
