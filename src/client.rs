use tracing::info;

use crate::credentials::Credentials;
use crate::endpoints::Endpoints;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::{Config, CredentialSnapshot, Result, Root};

/// A session against the file-storage API.
///
/// Owns the credential store exclusively. Endpoint methods take `&self`
/// and may run concurrently - each reads the signing keys at send time.
/// The handshake ([`authenticate`](Client::authenticate)) and
/// [`sign_out`](Client::sign_out) take `&mut self`, the only paths that
/// mutate credentials.
#[derive(Debug)]
pub struct Client<T = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) endpoints: Endpoints,
    pub(crate) credentials: Credentials,
    pub(crate) root: Root,
}

impl Client<ReqwestTransport> {
    /// Build a client over a fresh `reqwest::Client`.
    ///
    /// Fails with [`Error::InvalidCredentials`](crate::Error) when the
    /// configuration carries a partial user-token triple.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::default())
    }
}

impl<T> Client<T>
where
    T: HttpTransport,
{
    /// Build a client over a caller-supplied transport.
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        let credentials = Credentials::from_config(&config)?;
        let endpoints = Endpoints::derive(&config);
        let root = config.root();
        Ok(Client {
            transport,
            endpoints,
            credentials,
            root,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// User id of the authenticated user, if any.
    pub fn uid(&self) -> Option<&str> {
        self.credentials.uid()
    }

    /// Serializable credentials for resuming this session later without
    /// repeating the handshake. Token fields are present only while a user
    /// is authenticated.
    pub fn credentials(&self) -> CredentialSnapshot {
        self.credentials.snapshot()
    }

    /// Drop the user token locally.
    ///
    /// Requests already dispatched keep the credentials they were signed
    /// with; there is no retroactive cancellation.
    pub fn sign_out(&mut self) {
        self.credentials.clear();
        info!("signed out, user token dropped");
    }

    /// Storage scope file paths resolve against.
    pub fn root(&self) -> Root {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Error};

    #[test]
    fn rejects_partial_token_triple() {
        let mut config = Config::new("ck", "cs");
        config.user_token = Some("t".into());
        config.user_token_secret = Some("ts".into());
        let err = Client::new(config).unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));
    }

    #[test]
    fn resumes_authenticated_session() {
        let config = Config::new("ck", "cs").token("t", "ts", "99");
        let client = Client::new(config).unwrap();
        assert!(client.is_authenticated());
        assert_eq!(client.uid(), Some("99"));
        assert_eq!(client.root(), Root::Dropbox);
    }

    #[test]
    fn sign_out_drops_the_token() {
        let config = Config::new("ck", "cs").token("t", "ts", "99");
        let mut client = Client::new(config).unwrap();
        client.sign_out();
        assert!(!client.is_authenticated());
        assert_eq!(client.credentials().token, None);
    }
}
