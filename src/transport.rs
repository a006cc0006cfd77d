use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use url::Url;

use crate::Result;

/// One fully prepared HTTP request: URL with query attached, optional
/// `Authorization` header, and at most one body representation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub authorization: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded`, already serialized. Participates
    /// in the OAuth signature.
    Form(String),
    /// Raw file contents. Never signed.
    Binary(Vec<u8>),
    /// `multipart/form-data` file upload. Never signed.
    Multipart(UploadPart),
}

/// File part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub field: String,
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Status and raw body of a completed request. The dispatcher decides how
/// to decode the body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn utf8_body(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Asynchronous HTTP execution seam.
///
/// The production implementation is [`ReqwestTransport`]; tests substitute
/// scripted doubles. Implementations perform exactly one attempt - retry
/// policy belongs to the embedding application.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T> HttpTransport for std::sync::Arc<T>
where
    T: HttpTransport + ?Sized,
{
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing `reqwest::Client`, keeping its connection pool and
    /// TLS configuration.
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestTransport { inner: client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.inner.request(request.method, request.url);
        if let Some(authorization) = request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(form) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(form),
            RequestBody::Binary(bytes) => builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
            RequestBody::Multipart(part) => {
                let form = reqwest::multipart::Form::new().part(
                    part.field,
                    reqwest::multipart::Part::bytes(part.contents).file_name(part.file_name),
                );
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = HttpResponse {
            status: 206,
            body: Vec::new(),
        };
        let not_found = HttpResponse {
            status: 404,
            body: b"{\"error\": \"not found\"}".to_vec(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
        assert!(not_found.utf8_body().contains("not found"));
    }
}
