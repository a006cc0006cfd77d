use std::borrow::Cow;

use http::Method;
use oauth1_request::signer::Signer as OAuthSigner;
use oauth1_request::{HmacSha1, Options};
use url::Url;

use crate::credentials::SigningKeys;
use crate::OAUTH_KEY_PREFIX;

/// Computes the `Authorization: OAuth ...` header for one request.
///
/// Signs with HMAC-SHA1, the only method the v1 API accepts. The payload is
/// the url-encoded query string (`is_url_query`) or form body; binary and
/// multipart bodies never reach the signer.
#[derive(Debug, Clone)]
pub(crate) struct Signer<'a> {
    keys: SigningKeys<'a>,
    parameters: OAuthParameters<'a>,
}

impl<'a> Signer<'a> {
    pub fn new(keys: SigningKeys<'a>, parameters: OAuthParameters<'a>) -> Self {
        Signer { keys, parameters }
    }

    pub fn generate_signature(
        self,
        method: Method,
        url: Url,
        payload: &str,
        is_url_query: bool,
    ) -> String {
        let (token, token_secret) = match self.keys.token {
            Some((token, token_secret)) => (Some(token), Some(token_secret)),
            None => (None, None),
        };
        let options = self.parameters.build_options(token);

        // destructure the payload and sort by alphabetical order
        let parsed_payload: Vec<(Cow<str>, Cow<str>)> =
            url::form_urlencoded::parse(payload.as_bytes())
                .into_iter()
                .collect();
        let oauth_marker = vec![(Cow::from(OAUTH_KEY_PREFIX), Cow::from(""))];
        let mut sorted_query = [parsed_payload, oauth_marker].concat();
        sorted_query.sort();

        // divide key-value items at the "oauth_" marker; oauth_* parameters
        // themselves are contributed through `options`, not the payload
        let mut divided = sorted_query.splitn(2, |(k, _)| k == OAUTH_KEY_PREFIX);
        let query_before_oauth = divided.next().unwrap();
        let query_after_oauth = divided.next().unwrap_or_default();

        let mut signer = if is_url_query {
            OAuthSigner::with_signature_method(
                HmacSha1,
                method.as_str(),
                url,
                self.keys.consumer_secret,
                token_secret,
            )
        } else {
            OAuthSigner::form_with_signature_method(
                HmacSha1,
                method.as_str(),
                url,
                self.keys.consumer_secret,
                token_secret,
            )
        };

        // keys [a, oauth_)
        for (key, value) in query_before_oauth {
            if !key.starts_with(OAUTH_KEY_PREFIX) {
                signer.parameter(key, value);
            }
        }
        let mut signer = signer.oauth_parameters(self.keys.consumer_key, &options);
        // keys (oauth_, z]
        for (key, value) in query_after_oauth {
            if !key.starts_with(OAUTH_KEY_PREFIX) {
                signer.parameter(key, value);
            }
        }

        signer.finish().authorization
    }
}

/// Protocol parameters the caller may pin.
///
/// `nonce` and `timestamp` default to fresh values generated at signing
/// time; pinning them is only useful for reproducing known signatures.
#[derive(Debug, Clone, Default)]
pub(crate) struct OAuthParameters<'a> {
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    version: bool,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    #[cfg(test)]
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    #[cfg(test)]
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// When set, `oauth_version=1.0` is included in the signed parameters.
    #[cfg(test)]
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }

    fn build_options(&'a self, token: Option<&'a str>) -> Options<'a> {
        let mut opt = Options::new();
        if let Some(ref nonce) = self.nonce {
            opt.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            opt.timestamp(timestamp);
        }
        if let Some(token) = token {
            opt.token(token);
        }
        opt.version(self.version);
        opt
    }
}
