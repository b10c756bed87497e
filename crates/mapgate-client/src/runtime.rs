//! Map runtime seam: loading the external SDK and binding its components.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ClientError;
use crate::gateway::Gateway;

/// SDK components the map view renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Map,
    DefaultSchemeLayer,
    DefaultFeaturesLayer,
    Marker,
}

pub const REQUIRED_COMPONENTS: [Component; 4] = [
    Component::Map,
    Component::DefaultSchemeLayer,
    Component::DefaultFeaturesLayer,
    Component::Marker,
];

/// Components bound by a successful runtime initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapComponents {
    bound: Vec<Component>,
}

impl MapComponents {
    pub fn new(bound: Vec<Component>) -> Self {
        Self { bound }
    }

    pub fn contains(&self, component: Component) -> bool {
        self.bound.contains(&component)
    }

    pub fn is_complete(&self) -> bool {
        REQUIRED_COMPONENTS.iter().all(|c| self.contains(*c))
    }
}

/// Explicit initialization state handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuntimeBindings {
    #[default]
    NotInitialized,
    Initialized(MapComponents),
}

impl RuntimeBindings {
    pub fn is_initialized(&self) -> bool {
        matches!(self, RuntimeBindings::Initialized(_))
    }

    pub fn components(&self) -> Option<&MapComponents> {
        match self {
            RuntimeBindings::Initialized(components) => Some(components),
            RuntimeBindings::NotInitialized => None,
        }
    }
}

/// Host environment for the map SDK. In a browser `load_script` injects a
/// script element and resolves on its load/error event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapRuntime: Send + Sync {
    /// Load the SDK from `src`. Resolves once loaded, errors if it failed.
    async fn load_script(&self, src: &str) -> Result<(), ClientError>;

    /// The SDK's own asynchronous readiness step plus component binding.
    async fn initialize(&self) -> Result<MapComponents, ClientError>;
}

/// Runtime without a renderer: fetches the script through the gateway to
/// prove it is reachable, and binds every component.
pub struct HeadlessRuntime<G> {
    gateway: Arc<G>,
}

impl<G: Gateway> HeadlessRuntime<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<G: Gateway> MapRuntime for HeadlessRuntime<G> {
    async fn load_script(&self, src: &str) -> Result<(), ClientError> {
        debug!(src, "Loading map script");
        let script = self
            .gateway
            .map_script()
            .await
            .map_err(|e| ClientError::ScriptLoad(e.to_string()))?;
        if script.trim().is_empty() {
            return Err(ClientError::ScriptLoad("empty script".to_string()));
        }
        Ok(())
    }

    async fn initialize(&self) -> Result<MapComponents, ClientError> {
        Ok(MapComponents::new(REQUIRED_COMPONENTS.to_vec()))
    }
}
