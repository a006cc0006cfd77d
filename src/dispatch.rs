use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::credentials::SigningKeys;
use crate::signer::{OAuthParameters, Signer};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody, UploadPart};
use crate::{Client, Error, Result, Root};

/// RFC 3986 unreserved characters stay; everything else, including `/`, is
/// escaped. A segment can therefore never introduce a new path separator.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Description of one API call: endpoint base, extra path segments, the
/// parameter set, and at most one payload.
#[derive(Debug)]
pub(crate) struct ApiRequest<'a> {
    method: Method,
    base: &'a str,
    segments: Vec<String>,
    params: Params,
    payload: Payload,
}

#[derive(Debug)]
enum Payload {
    None,
    Binary(Vec<u8>),
    Upload(UploadPart),
}

impl<'a> ApiRequest<'a> {
    fn new(method: Method, base: &'a str) -> Self {
        ApiRequest {
            method,
            base,
            segments: Vec::new(),
            params: Params::new(),
            payload: Payload::None,
        }
    }

    pub fn get(base: &'a str) -> Self {
        Self::new(Method::GET, base)
    }

    pub fn post(base: &'a str) -> Self {
        Self::new(Method::POST, base)
    }

    pub fn put(base: &'a str) -> Self {
        Self::new(Method::PUT, base)
    }

    /// Append the root selector followed by the components of a user path.
    pub fn path(mut self, root: Root, path: &str) -> Self {
        self.segments.push(root.as_str().to_string());
        self.segments
            .extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_string));
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Raw file contents; excluded from the OAuth signature.
    pub fn binary(mut self, contents: Vec<u8>) -> Self {
        self.payload = Payload::Binary(contents);
        self
    }

    /// Multipart file upload; excluded from the OAuth signature.
    pub fn upload(mut self, part: UploadPart) -> Self {
        self.payload = Payload::Upload(part);
        self
    }
}

/// Ordered parameter set. An absent (`None`) value is omitted entirely; an
/// explicitly set falsy value (`overwrite=false`) is preserved.
#[derive(Debug, Default, Clone)]
pub(crate) struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set<V: ToString>(mut self, key: &'static str, value: V) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    fn entries(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Join an endpoint base with percent-encoded path segments.
///
/// Bases are plain strings until this point, so a malformed server base
/// surfaces here as a transport failure.
fn build_url(base: &str, segments: &[String]) -> Result<Url> {
    let mut full = base.trim_end_matches('/').to_string();
    for segment in segments {
        full.push('/');
        full.push_str(&utf8_percent_encode(segment, SEGMENT).to_string());
    }
    Url::parse(&full).map_err(|e| Error::Transport(format!("invalid request url {}: {}", full, e)))
}

impl<T> Client<T>
where
    T: HttpTransport,
{
    /// Dispatch with the credentials installed at send time.
    pub(crate) async fn send(&self, request: ApiRequest<'_>) -> Result<HttpResponse> {
        self.send_as(request, self.credentials.signing_keys()).await
    }

    /// Dispatch with explicit signing keys (the handshake legs sign with
    /// consumer-only or temporary keys, never the installed token).
    ///
    /// GET/PUT/DELETE-style requests sign in URL-query mode; a plain POST
    /// signs in form mode over its form body. Binary and multipart payloads
    /// are excluded from the signature base string, so only the URL and
    /// query parameters are covered for uploads.
    pub(crate) async fn send_as(
        &self,
        request: ApiRequest<'_>,
        keys: SigningKeys<'_>,
    ) -> Result<HttpResponse> {
        let ApiRequest {
            method,
            base,
            segments,
            params,
            payload,
        } = request;

        let bare_url = build_url(base, &segments)?;
        let encoded = serde_urlencoded::to_string(params.entries())
            .map_err(|e| Error::Transport(format!("unencodable parameters: {}", e)))?;

        let form_mode = method == Method::POST && matches!(payload, Payload::None);
        let authorization = Signer::new(keys, OAuthParameters::new()).generate_signature(
            method.clone(),
            bare_url.clone(),
            &encoded,
            !form_mode,
        );

        let mut url = bare_url;
        let body = if form_mode {
            RequestBody::Form(encoded)
        } else {
            if !encoded.is_empty() {
                url.set_query(Some(&encoded));
            }
            match payload {
                Payload::None => RequestBody::Empty,
                Payload::Binary(contents) => RequestBody::Binary(contents),
                Payload::Upload(part) => RequestBody::Multipart(part),
            }
        };

        debug!(method = %method, url = %url, "dispatching signed request");
        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                authorization: Some(authorization),
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(Error::Api {
                status: response.status,
                body: response.utf8_body().into_owned(),
            });
        }
        Ok(response)
    }

    pub(crate) async fn fetch_json(&self, request: ApiRequest<'_>) -> Result<Value> {
        let response = self.send(request).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub(crate) async fn fetch_bytes(&self, request: ApiRequest<'_>) -> Result<Vec<u8>> {
        Ok(self.send(request).await?.body)
    }
}
