//! Debounced suggest-as-you-type and suggestion → location resolution.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::gateway::Gateway;
use crate::geocode::{parse_geocode_location, parse_suggestions};
use crate::model::{Location, Suggestion};

pub const GEOCODE_FAILED_MESSAGE: &str = "Failed to retrieve location details. Please try again.";

/// What the search box and map view render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub location: Location,
    pub error: Option<String>,
}

/// How one `SearchFlow::input` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Blank input; suggestions were cleared without a request.
    Cleared,
    /// A later input arrived inside the debounce window.
    Superseded,
    /// The request went out but a newer input or selection overtook it.
    Stale,
    /// Suggestions replaced with this many entries.
    Applied(usize),
}

pub struct SearchFlow<G> {
    gateway: Arc<G>,
    debouncer: Debouncer,
    state: Mutex<SearchState>,
}

impl<G: Gateway> SearchFlow<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_debouncer(gateway, Debouncer::default())
    }

    pub fn with_window(gateway: Arc<G>, window: Duration) -> Self {
        Self::with_debouncer(gateway, Debouncer::new(window))
    }

    fn with_debouncer(gateway: Arc<G>, debouncer: Debouncer) -> Self {
        Self {
            gateway,
            debouncer,
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.lock().clone()
    }

    /// Record the typed text and, once typing pauses, fetch suggestions for it.
    /// Only the response for the newest input is ever applied.
    pub async fn input(&self, text: &str) -> InputOutcome {
        {
            let mut state = self.state.lock();
            if text.trim().is_empty() {
                self.debouncer.bump();
                state.query.clear();
                state.suggestions.clear();
                return InputOutcome::Cleared;
            }
            state.query = text.to_string();
        }

        let Some(ticket) = self.debouncer.settle().await else {
            return InputOutcome::Superseded;
        };

        let suggestions = match self.gateway.suggest(text).await {
            Ok(body) => parse_suggestions(&body),
            Err(e) => {
                warn!("Fetching suggestions failed: {}", e);
                Vec::new()
            }
        };

        let mut state = self.state.lock();
        if !self.debouncer.is_current(ticket) {
            debug!(query = text, "Dropping stale suggestions");
            return InputOutcome::Stale;
        }
        let count = suggestions.len();
        state.suggestions = suggestions;
        InputOutcome::Applied(count)
    }

    /// Geocode the suggestion and recenter on it. Suggestions without a
    /// `uri` are ignored; on failure the previous location stays in place.
    pub async fn select(&self, suggestion: &Suggestion) -> Option<Location> {
        let uri = suggestion.uri.as_deref().filter(|uri| !uri.is_empty())?;

        let resolved = match self.gateway.geocode(uri).await {
            Ok(body) => parse_geocode_location(&body),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock();
        match resolved {
            Ok(location) => {
                self.debouncer.bump();
                state.location = location;
                state.query.clear();
                state.suggestions.clear();
                state.error = None;
                Some(location)
            }
            Err(e) => {
                warn!("Geocoding {:?} failed: {}", suggestion.label(), e);
                state.error = Some(GEOCODE_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    /// User panned the map. Zoom is left alone.
    pub fn map_moved(&self, center: [f64; 2]) {
        self.state.lock().location.center = center;
    }
}
