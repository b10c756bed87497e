//! Session middleware configuration

use mapgate_shared::config::SessionSettings;
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::store::MemorySessionStore;

pub type GatewaySessionLayer = SessionManagerLayer<MemorySessionStore, SignedCookie>;

/// Cookie signing key derived from the configured secret. SHA-512 gives
/// exactly the 64 bytes the cookie key needs, whatever the secret length.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Signed, HttpOnly session cookie with a sliding inactivity expiry.
/// `secure` should be on whenever the app is served over HTTPS.
pub fn session_layer(
    store: MemorySessionStore,
    settings: &SessionSettings,
    secure: bool,
) -> GatewaySessionLayer {
    SessionManagerLayer::new(store)
        .with_name(settings.cookie_name.clone())
        .with_expiry(Expiry::OnInactivity(Duration::hours(settings.ttl_hours)))
        .with_always_save(true)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_path("/")
        .with_signed(signing_key(settings.secret()))
}
