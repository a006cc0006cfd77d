use serde::{Deserialize, Serialize};

/// Production API server; the auth and file-content servers are derived
/// from it unless overridden.
pub const DEFAULT_API_SERVER: &str = "https://api.dropbox.com";

/// Storage scope a file path is resolved against.
///
/// `Sandbox` restricts access to the app-private folder; `Dropbox` covers
/// the user's whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    Sandbox,
    Dropbox,
}

impl Root {
    pub fn as_str(self) -> &'static str {
        match self {
            Root::Sandbox => "sandbox",
            Root::Dropbox => "dropbox",
        }
    }
}

/// Session configuration consumed by [`Client::new`](crate::Client::new).
///
/// `user_token`, `user_token_secret` and `user_id` must either all be set
/// (resuming a previous session from a
/// [`CredentialSnapshot`](crate::CredentialSnapshot)) or all be absent;
/// a partial triple is rejected at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub use_sandbox_root: bool,
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "default_api_server")]
    pub api_server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_server: Option<String>,
}

fn default_api_server() -> String {
    DEFAULT_API_SERVER.to_string()
}

impl Config {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Config {
            use_sandbox_root: false,
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            user_token: None,
            user_token_secret: None,
            user_id: None,
            api_server: default_api_server(),
            auth_server: None,
            file_server: None,
        }
    }

    /// Restrict file access to the app-private sandbox folder.
    pub fn sandbox_root(self, use_sandbox_root: bool) -> Self {
        Config {
            use_sandbox_root,
            ..self
        }
    }

    /// Resume an authenticated session with a previously issued token.
    pub fn token<TToken, TSecret, TUid>(self, token: TToken, token_secret: TSecret, uid: TUid) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
        TUid: Into<String>,
    {
        Config {
            user_token: Some(token.into()),
            user_token_secret: Some(token_secret.into()),
            user_id: Some(uid.into()),
            ..self
        }
    }

    pub fn api_server<T: Into<String>>(self, api_server: T) -> Self {
        Config {
            api_server: api_server.into(),
            ..self
        }
    }

    pub fn auth_server<T: Into<String>>(self, auth_server: T) -> Self {
        Config {
            auth_server: Some(auth_server.into()),
            ..self
        }
    }

    pub fn file_server<T: Into<String>>(self, file_server: T) -> Self {
        Config {
            file_server: Some(file_server.into()),
            ..self
        }
    }

    pub(crate) fn root(&self) -> Root {
        if self.use_sandbox_root {
            Root::Sandbox
        } else {
            Root::Dropbox
        }
    }
}
