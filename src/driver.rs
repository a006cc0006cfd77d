use async_trait::async_trait;

use crate::Result;

/// Strategy supplied by the embedding application to drive the user through
/// the browser-based consent step of the handshake.
///
/// The client never performs UI actions itself: it hands the fully built
/// authorization URL to the driver and waits for the driver's completion
/// signal before exchanging the request token. Variants range from an
/// in-app browser redirect to a popup window to a scripted test double.
///
/// The driver is responsible for bounding how long it waits on the user; a
/// driver that never completes leaves the handshake suspended at the
/// authorization step for good.
///
/// ```no_run
/// use async_trait::async_trait;
/// use dropbox_v1::{AuthorizationDriver, Result};
///
/// struct PrintDriver;
///
/// #[async_trait]
/// impl AuthorizationDriver for PrintDriver {
///     fn callback_url(&self) -> &str {
///         "https://example.com/oauth_callback"
///     }
///
///     async fn authorize(&self, authorize_url: &str) -> Result<()> {
///         println!("visit and approve: {}", authorize_url);
///         // resolve once the callback URL has been hit
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait AuthorizationDriver: Send + Sync {
    /// Callback URL registered with the service; attached to the
    /// authorization redirect as `oauth_callback`.
    fn callback_url(&self) -> &str;

    /// Drive the user through consent at `authorize_url`; resolve once the
    /// user has approved (or reject to abort the handshake).
    async fn authorize(&self, authorize_url: &str) -> Result<()>;
}
