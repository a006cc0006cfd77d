use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::dispatch::ApiRequest;
use crate::driver::AuthorizationDriver;
use crate::transport::HttpTransport;
use crate::{
    Client, Error, Result, TokenReaderError, TokenReaderResult, OAUTH_CALLBACK_KEY,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY, UID_KEY,
};

/// Response of the request-token and access-token endpoints
/// (`application/x-www-form-urlencoded` key-value pairs).
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth token
    pub oauth_token: String,
    /// OAuth token secret
    pub oauth_token_secret: String,
    /// Other attributes (`uid` on the access-token response)
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

pub(crate) fn read_token_response(text: &str) -> TokenReaderResult<TokenResponse> {
    let mut destructured = text
        .split('&')
        .map(|e| e.splitn(2, '='))
        .map(|v| {
            let mut iter = v.into_iter();
            (
                iter.next().unwrap_or_default().to_string(),
                iter.next().unwrap_or_default().to_string(),
            )
        })
        .collect::<HashMap<String, String>>();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_KEY,
            text.to_string(),
        )),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}

#[derive(Debug)]
struct AccessToken {
    token: String,
    token_secret: String,
    uid: String,
}

impl<T> Client<T>
where
    T: HttpTransport,
{
    /// Run the three-legged OAuth handshake and install the resulting
    /// access token, returning the authorized user's id.
    ///
    /// The legs execute strictly in sequence, each awaiting the previous
    /// one: request token (consumer-only signature), user consent through
    /// `driver`, access-token exchange (temporary-token signature). The
    /// temporary token lives only inside this call.
    ///
    /// Any failure after the request-token leg resets the credential store
    /// completely - a failed re-authentication must not leave a previously
    /// installed identity behind. Taking `&mut self` keeps a second
    /// handshake from starting while one is in flight.
    pub async fn authenticate<D>(&mut self, driver: &D) -> Result<String>
    where
        D: AuthorizationDriver + ?Sized,
    {
        debug!("requesting temporary oauth token");
        let temporary = match self.obtain_request_token().await {
            Ok(temporary) => temporary,
            Err(err) => {
                warn!(error = %err, "request-token leg failed");
                return Err(as_handshake(err));
            }
        };

        match self.complete_handshake(driver, &temporary).await {
            Ok(access) => {
                let uid = access.uid.clone();
                self.credentials
                    .install(access.token, access.token_secret, access.uid);
                info!(uid = %uid, "oauth handshake complete");
                Ok(uid)
            }
            Err(err) => {
                self.credentials.clear();
                warn!(error = %err, "oauth handshake failed, credentials reset");
                Err(as_handshake(err))
            }
        }
    }

    async fn obtain_request_token(&self) -> Result<TokenResponse> {
        let request = ApiRequest::post(&self.endpoints.request_token);
        let response = self.send_as(request, self.credentials.consumer_keys()).await?;
        Ok(read_token_response(&response.utf8_body())?)
    }

    async fn complete_handshake<D>(
        &self,
        driver: &D,
        temporary: &TokenResponse,
    ) -> Result<AccessToken>
    where
        D: AuthorizationDriver + ?Sized,
    {
        let authorize_url = self.authorize_url(&temporary.oauth_token, driver.callback_url())?;
        debug!(url = %authorize_url, "redirecting user to authorization page");
        driver.authorize(&authorize_url).await?;

        self.exchange_access_token(&temporary.oauth_token, &temporary.oauth_token_secret)
            .await
    }

    async fn exchange_access_token(&self, token: &str, token_secret: &str) -> Result<AccessToken> {
        let keys = self.credentials.handshake_keys(token, token_secret);
        let request = ApiRequest::post(&self.endpoints.access_token);
        let response = self.send_as(request, keys).await?;

        let text = response.utf8_body().into_owned();
        let parsed = read_token_response(&text)?;
        let uid = parsed
            .remain
            .get(UID_KEY)
            .cloned()
            .ok_or(TokenReaderError::TokenKeyNotFound(UID_KEY, text))?;
        Ok(AccessToken {
            token: parsed.oauth_token,
            token_secret: parsed.oauth_token_secret,
            uid,
        })
    }

    fn authorize_url(&self, request_token: &str, callback: &str) -> Result<String> {
        let mut url = Url::parse(&self.endpoints.authorize)
            .map_err(|e| Error::Transport(format!("invalid authorize url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair(OAUTH_TOKEN_KEY, request_token)
            .append_pair(OAUTH_CALLBACK_KEY, callback);
        Ok(url.to_string())
    }
}

fn as_handshake(err: Error) -> Error {
    match err {
        err @ Error::Handshake(_) => err,
        err => Error::Handshake(err.to_string()),
    }
}
