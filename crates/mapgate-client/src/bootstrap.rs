//! Bootstrap state machine: key check → key entry → script load → map ready.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{Gateway, SCRIPT_ENDPOINT};
use crate::runtime::{MapRuntime, RuntimeBindings};

pub const INVALID_KEY_MESSAGE: &str = "Please enter a valid API key.";
pub const SET_KEY_FAILED_MESSAGE: &str = "Failed to set API key. Please try again.";
pub const SCRIPT_FAILED_MESSAGE: &str = "Failed to load the map script. Please check your API key.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    NoKey,
    KeySubmitted,
    ScriptLoading,
    MapReady,
    /// Displayed to the user; a new key submission recovers from it.
    Error(String),
}

/// Drives one client from first mount to a ready map. Never retries on its
/// own: every failure waits for the user to submit a key again.
pub struct Bootstrap<G, R> {
    gateway: Arc<G>,
    runtime: R,
    state: BootstrapState,
    bindings: RuntimeBindings,
}

impl<G: Gateway, R: MapRuntime> Bootstrap<G, R> {
    pub fn new(gateway: Arc<G>, runtime: R) -> Self {
        Self {
            gateway,
            runtime,
            state: BootstrapState::NoKey,
            bindings: RuntimeBindings::NotInitialized,
        }
    }

    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    pub fn bindings(&self) -> &RuntimeBindings {
        &self.bindings
    }

    pub fn is_ready(&self) -> bool {
        self.state == BootstrapState::MapReady
    }

    /// A key already held by the session skips key entry entirely.
    pub async fn mount(&mut self) -> &BootstrapState {
        if self.state != BootstrapState::NoKey {
            return &self.state;
        }

        match self.gateway.check_api_key().await {
            Ok(true) => self.load_map().await,
            Ok(false) => debug!("No API key in session"),
            Err(e) => warn!("Checking API key failed: {}", e),
        }
        &self.state
    }

    pub async fn submit_key(&mut self, text: &str) -> &BootstrapState {
        if !matches!(self.state, BootstrapState::NoKey | BootstrapState::Error(_)) {
            return &self.state;
        }

        let key = text.trim();
        if key.is_empty() {
            self.transition(BootstrapState::Error(INVALID_KEY_MESSAGE.to_string()));
            return &self.state;
        }

        self.transition(BootstrapState::KeySubmitted);
        match self.gateway.set_api_key(key).await {
            Ok(()) => self.load_map().await,
            Err(e) => {
                warn!("Setting API key failed: {}", e);
                self.transition(BootstrapState::Error(SET_KEY_FAILED_MESSAGE.to_string()));
            }
        }
        &self.state
    }

    async fn load_map(&mut self) {
        self.transition(BootstrapState::ScriptLoading);

        let loaded = match self.runtime.load_script(SCRIPT_ENDPOINT).await {
            Ok(()) => self.runtime.initialize().await,
            Err(e) => Err(e),
        };

        match loaded {
            Ok(components) => {
                self.bindings = RuntimeBindings::Initialized(components);
                self.transition(BootstrapState::MapReady);
            }
            Err(e) => {
                warn!("Map runtime failed to start: {}", e);
                self.transition(BootstrapState::Error(SCRIPT_FAILED_MESSAGE.to_string()));
            }
        }
    }

    fn transition(&mut self, next: BootstrapState) {
        debug!(from = ?self.state, to = ?next, "Bootstrap transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::gateway::MockGateway;
    use crate::runtime::{MapComponents, MockMapRuntime, REQUIRED_COMPONENTS};
    use mockall::predicate::eq;

    fn working_runtime() -> MockMapRuntime {
        let mut runtime = MockMapRuntime::new();
        runtime
            .expect_load_script()
            .with(eq(SCRIPT_ENDPOINT))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_initialize()
            .times(1)
            .returning(|| Ok(MapComponents::new(REQUIRED_COMPONENTS.to_vec())));
        runtime
    }

    fn idle_runtime() -> MockMapRuntime {
        let mut runtime = MockMapRuntime::new();
        runtime.expect_load_script().never();
        runtime.expect_initialize().never();
        runtime
    }

    #[tokio::test]
    async fn test_mount_with_existing_key_goes_straight_to_ready() {
        let mut gateway = MockGateway::new();
        gateway.expect_check_api_key().times(1).returning(|| Ok(true));
        gateway.expect_set_api_key().never();

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), working_runtime());
        assert_eq!(bootstrap.mount().await, &BootstrapState::MapReady);
        assert!(bootstrap.bindings().is_initialized());
    }

    #[tokio::test]
    async fn test_mount_without_key_waits_for_input() {
        let mut gateway = MockGateway::new();
        gateway.expect_check_api_key().returning(|| Ok(false));

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), idle_runtime());
        assert_eq!(bootstrap.mount().await, &BootstrapState::NoKey);
        assert!(!bootstrap.bindings().is_initialized());
    }

    #[tokio::test]
    async fn test_mount_check_failure_stays_no_key() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_check_api_key()
            .returning(|| Err(ClientError::Transport("connection refused".to_string())));

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), idle_runtime());
        assert_eq!(bootstrap.mount().await, &BootstrapState::NoKey);
    }

    #[tokio::test]
    async fn test_submit_key_loads_map() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_set_api_key()
            .with(eq("ABC123"))
            .times(1)
            .returning(|_| Ok(()));

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), working_runtime());
        assert_eq!(bootstrap.submit_key("  ABC123 ").await, &BootstrapState::MapReady);
        assert!(bootstrap.is_ready());
    }

    #[tokio::test]
    async fn test_blank_key_is_rejected_locally() {
        let mut gateway = MockGateway::new();
        gateway.expect_set_api_key().never();

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), idle_runtime());
        assert_eq!(
            bootstrap.submit_key("   ").await,
            &BootstrapState::Error(INVALID_KEY_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_set_key_failure_then_resubmit_recovers() {
        let mut gateway = MockGateway::new();
        let mut seq = mockall::Sequence::new();
        gateway
            .expect_set_api_key()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(ClientError::Gateway {
                    status: 500,
                    message: "Session error".to_string(),
                })
            });
        gateway
            .expect_set_api_key()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), working_runtime());
        assert_eq!(
            bootstrap.submit_key("ABC123").await,
            &BootstrapState::Error(SET_KEY_FAILED_MESSAGE.to_string())
        );
        assert_eq!(bootstrap.submit_key("ABC123").await, &BootstrapState::MapReady);
    }

    #[tokio::test]
    async fn test_script_failure_reports_key_hint() {
        let mut gateway = MockGateway::new();
        gateway.expect_set_api_key().returning(|_| Ok(()));

        let mut runtime = MockMapRuntime::new();
        runtime
            .expect_load_script()
            .returning(|_| Err(ClientError::ScriptLoad("403".to_string())));
        runtime.expect_initialize().never();

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), runtime);
        assert_eq!(
            bootstrap.submit_key("WRONG").await,
            &BootstrapState::Error(SCRIPT_FAILED_MESSAGE.to_string())
        );
        assert!(!bootstrap.bindings().is_initialized());
    }

    #[tokio::test]
    async fn test_ready_ignores_further_submissions() {
        let mut gateway = MockGateway::new();
        gateway.expect_set_api_key().times(1).returning(|_| Ok(()));

        let mut bootstrap = Bootstrap::new(Arc::new(gateway), working_runtime());
        bootstrap.submit_key("ABC123").await;
        assert_eq!(bootstrap.submit_key("OTHER").await, &BootstrapState::MapReady);
    }
}
