/*!
dropbox-v1: Dropbox Core API v1 over reqwest with OAuth 1.0a signing.

# Overview

This library is a client-side access layer for the Dropbox Core API v1.
It runs the three-legged OAuth 1.0a handshake, keeps the per-session
credentials, and signs every API request with
[oauth1-request](https://crates.io/crates/oauth1-request) before handing it
to [reqwest](https://crates.io/crates/reqwest).

The browser consent step of the handshake is pluggable: implement
[`AuthorizationDriver`] with whatever redirect or popup mechanism fits your
application, and the client takes care of the rest of the protocol.

# How to use

## Use case 1 - authorizing a user

```no_run
use dropbox_v1::{AuthorizationDriver, Client, Config};

# async fn run(driver: &dyn AuthorizationDriver) -> dropbox_v1::Result<()> {
// prepare authorization info
let config = Config::new("<CONSUMER_KEY>", "<CONSUMER_SECRET>").sandbox_root(true);
let mut client = Client::new(config)?;

// runs request token -> user consent (via the driver) -> access token
let uid = client.authenticate(driver).await?;
println!("authorized as uid {}", uid);

// persist for the next session
let snapshot = client.credentials();
# Ok(())
# }
```

## Use case 2 - resuming a session and calling the API

```no_run
use dropbox_v1::{Client, Config, MetadataOptions};

# async fn run() -> dropbox_v1::Result<()> {
let config = Config::new("<CONSUMER_KEY>", "<CONSUMER_SECRET>")
    .token("<USER_TOKEN>", "<USER_TOKEN_SECRET>", "<UID>");
let client = Client::new(config)?;

let listing = client
    .metadata(
        "/photos",
        &MetadataOptions {
            file_limit: Some(100),
            ..Default::default()
        },
    )
    .await?;
println!("{:#?}", listing);

let contents = client.get_file("/notes/todo.txt", &Default::default()).await?;
println!("{} bytes", contents.len());
# Ok(())
# }
```

*/
mod client;
mod config;
mod credentials;
mod dispatch;
mod driver;
mod endpoints;
mod error;
mod files;
mod handshake;
mod signer;
#[cfg(test)]
mod testing;
mod transport;

// exposed to external program
pub use client::Client;
pub use config::{Config, Root, DEFAULT_API_SERVER};
pub use credentials::CredentialSnapshot;
pub use driver::AuthorizationDriver;
pub use error::{Error, Result, TokenReaderError, TokenReaderResult};
pub use files::{
    DeltaOptions, GetFileOptions, MetadataOptions, PutFileOptions, RevisionsOptions,
    SearchOptions, SharesOptions, ThumbnailOptions,
};
pub use handshake::TokenResponse;
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody, UploadPart,
};

// exposed constant variables
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `uid` on the access-token response.
pub const UID_KEY: &str = "uid";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
