use serde::{Deserialize, Serialize};

use crate::{Config, Error, Result};

/// Consumer key pair plus, once a user has authorized the app, the access
/// token triple issued for them.
///
/// Exclusively owned by one [`Client`](crate::Client); only the handshake
/// and [`sign_out`](crate::Client::sign_out) mutate it. API calls read the
/// current signing keys at send time, so a call dispatched before a reset
/// still completes with the credentials it started with.
#[derive(Debug, Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    user: Option<UserToken>,
}

#[derive(Debug, Clone)]
struct UserToken {
    token: String,
    token_secret: String,
    uid: String,
}

/// Borrowed view of the secrets one request is signed with.
///
/// `token` is absent for the request-token leg, the temporary request token
/// during the access-token leg, and the installed user token afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SigningKeys<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: Option<(&'a str, &'a str)>,
}

/// Serializable projection of [`Credentials`] for resuming a session
/// without repeating the handshake.
///
/// The token fields are omitted entirely (not serialized as null) when no
/// user is authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialSnapshot {
    pub key: String,
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Credentials {
    /// Validate and adopt the token material of a [`Config`].
    ///
    /// A token supplied without its paired secret and user id is invalid
    /// and must never reach the signer.
    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        let user = match (&config.user_token, &config.user_token_secret, &config.user_id) {
            (None, None, None) => None,
            (Some(token), Some(token_secret), Some(uid)) => Some(UserToken {
                token: token.clone(),
                token_secret: token_secret.clone(),
                uid: uid.clone(),
            }),
            _ => {
                return Err(Error::InvalidCredentials(
                    "user_token, user_token_secret and user_id must be supplied together".into(),
                ))
            }
        };
        Ok(Credentials {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            user,
        })
    }

    /// Replace the whole token triple at once.
    pub(crate) fn install(&mut self, token: String, token_secret: String, uid: String) {
        self.user = Some(UserToken {
            token,
            token_secret,
            uid,
        });
    }

    /// Drop the user triple, returning to the unauthenticated state.
    pub(crate) fn clear(&mut self) {
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// User id of the authenticated user, if any.
    pub fn uid(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.uid.as_str())
    }

    pub fn snapshot(&self) -> CredentialSnapshot {
        CredentialSnapshot {
            key: self.consumer_key.clone(),
            secret: self.consumer_secret.clone(),
            token: self.user.as_ref().map(|u| u.token.clone()),
            token_secret: self.user.as_ref().map(|u| u.token_secret.clone()),
            uid: self.user.as_ref().map(|u| u.uid.clone()),
        }
    }

    /// Keys for ordinary API calls: the user token when present.
    pub(crate) fn signing_keys(&self) -> SigningKeys<'_> {
        SigningKeys {
            consumer_key: &self.consumer_key,
            consumer_secret: &self.consumer_secret,
            token: self
                .user
                .as_ref()
                .map(|u| (u.token.as_str(), u.token_secret.as_str())),
        }
    }

    /// Consumer-only keys for the request-token leg. The stored user token,
    /// if any, must not sign a fresh handshake.
    pub(crate) fn consumer_keys(&self) -> SigningKeys<'_> {
        SigningKeys {
            consumer_key: &self.consumer_key,
            consumer_secret: &self.consumer_secret,
            token: None,
        }
    }

    /// Keys carrying the temporary request token for the access-token leg.
    pub(crate) fn handshake_keys<'a>(&'a self, token: &'a str, token_secret: &'a str) -> SigningKeys<'a> {
        SigningKeys {
            consumer_key: &self.consumer_key,
            consumer_secret: &self.consumer_secret,
            token: Some((token, token_secret)),
        }
    }
}
