//! The endpoint catalog: uniform wrappers that build a parameter set and
//! delegate to the dispatcher. JSON endpoints return the decoded
//! `serde_json::Value`; content endpoints return the raw bytes.

use serde_json::Value;

use crate::dispatch::{ApiRequest, Params};
use crate::transport::{HttpTransport, UploadPart};
use crate::{Client, Result};

/// Parameters of [`Client::metadata`].
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Maximum number of folder entries to list.
    pub file_limit: Option<u32>,
    /// Previously returned folder hash; a match short-circuits with 304.
    pub hash: Option<String>,
    pub list: Option<bool>,
    pub include_deleted: Option<bool>,
    pub rev: Option<String>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::get_file`].
#[derive(Debug, Clone, Default)]
pub struct GetFileOptions {
    pub rev: Option<String>,
}

/// Parameters of [`Client::put_file`] and [`Client::post_file`].
#[derive(Debug, Clone, Default)]
pub struct PutFileOptions {
    /// `Some(false)` is transmitted; leaving it unset defers to the
    /// server default.
    pub overwrite: Option<bool>,
    pub parent_rev: Option<String>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::delta`].
#[derive(Debug, Clone, Default)]
pub struct DeltaOptions {
    /// Cursor from the previous delta page; absent for the first call.
    pub cursor: Option<String>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::revisions`].
#[derive(Debug, Clone, Default)]
pub struct RevisionsOptions {
    pub rev_limit: Option<u32>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub file_limit: Option<u32>,
    pub include_deleted: Option<bool>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::shares`].
#[derive(Debug, Clone, Default)]
pub struct SharesOptions {
    pub short_url: Option<bool>,
    pub locale: Option<String>,
}

/// Parameters of [`Client::thumbnails`].
#[derive(Debug, Clone, Default)]
pub struct ThumbnailOptions {
    /// `jpeg` (default) or `png`.
    pub format: Option<String>,
    /// `xs`, `s`, `m`, `l` or `xl`.
    pub size: Option<String>,
}

impl<T> Client<T>
where
    T: HttpTransport,
{
    /// GET `/1/account/info`: profile of the authenticated user.
    pub async fn account_info(&self) -> Result<Value> {
        self.fetch_json(ApiRequest::get(&self.endpoints.account_info))
            .await
    }

    /// GET `/1/metadata/{root}/{path}`: file or folder metadata.
    pub async fn metadata(&self, path: &str, options: &MetadataOptions) -> Result<Value> {
        let request = ApiRequest::get(&self.endpoints.metadata)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("file_limit", options.file_limit)
                    .opt("hash", options.hash.as_deref())
                    .opt("list", options.list)
                    .opt("include_deleted", options.include_deleted)
                    .opt("rev", options.rev.as_deref())
                    .opt("locale", options.locale.as_deref()),
            );
        self.fetch_json(request).await
    }

    /// GET `/1/files/{root}/{path}`: raw file contents.
    pub async fn get_file(&self, path: &str, options: &GetFileOptions) -> Result<Vec<u8>> {
        let request = ApiRequest::get(&self.endpoints.files)
            .path(self.root, path)
            .params(Params::new().opt("rev", options.rev.as_deref()));
        self.fetch_bytes(request).await
    }

    /// PUT `/1/files_put/{root}/{path}`: upload `contents` as the file at
    /// `path`. The body is excluded from the OAuth signature; only the URL
    /// and query parameters are signed.
    pub async fn put_file(
        &self,
        path: &str,
        contents: Vec<u8>,
        options: &PutFileOptions,
    ) -> Result<Value> {
        let request = ApiRequest::put(&self.endpoints.files_put)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("overwrite", options.overwrite)
                    .opt("parent_rev", options.parent_rev.as_deref())
                    .opt("locale", options.locale.as_deref()),
            )
            .binary(contents);
        self.fetch_json(request).await
    }

    /// POST `/1/files/{root}/{path}`: multipart upload of `file_name`
    /// into the folder at `path`.
    pub async fn post_file(
        &self,
        path: &str,
        file_name: &str,
        contents: Vec<u8>,
        options: &PutFileOptions,
    ) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.files)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("overwrite", options.overwrite)
                    .opt("parent_rev", options.parent_rev.as_deref())
                    .opt("locale", options.locale.as_deref()),
            )
            .upload(UploadPart {
                field: "file".to_string(),
                file_name: file_name.to_string(),
                contents,
            });
        self.fetch_json(request).await
    }

    /// POST `/1/delta`: one page of changes since `options.cursor`.
    pub async fn delta(&self, options: &DeltaOptions) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.delta).params(
            Params::new()
                .opt("cursor", options.cursor.as_deref())
                .opt("locale", options.locale.as_deref()),
        );
        self.fetch_json(request).await
    }

    /// GET `/1/revisions/{root}/{path}`.
    pub async fn revisions(&self, path: &str, options: &RevisionsOptions) -> Result<Value> {
        let request = ApiRequest::get(&self.endpoints.revisions)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("rev_limit", options.rev_limit)
                    .opt("locale", options.locale.as_deref()),
            );
        self.fetch_json(request).await
    }

    /// POST `/1/restore/{root}/{path}`: restore the revision `rev`.
    pub async fn restore(&self, path: &str, rev: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.restore)
            .path(self.root, path)
            .params(Params::new().set("rev", rev));
        self.fetch_json(request).await
    }

    /// GET `/1/search/{root}/{path}`: entries under `path` matching
    /// `query`.
    pub async fn search(&self, path: &str, query: &str, options: &SearchOptions) -> Result<Value> {
        let request = ApiRequest::get(&self.endpoints.search)
            .path(self.root, path)
            .params(
                Params::new()
                    .set("query", query)
                    .opt("file_limit", options.file_limit)
                    .opt("include_deleted", options.include_deleted)
                    .opt("locale", options.locale.as_deref()),
            );
        self.fetch_json(request).await
    }

    /// POST `/1/shares/{root}/{path}`: shareable link to a file.
    pub async fn shares(&self, path: &str, options: &SharesOptions) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.shares)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("short_url", options.short_url)
                    .opt("locale", options.locale.as_deref()),
            );
        self.fetch_json(request).await
    }

    /// POST `/1/media/{root}/{path}`: direct streaming link.
    pub async fn media(&self, path: &str) -> Result<Value> {
        self.fetch_json(ApiRequest::post(&self.endpoints.media).path(self.root, path))
            .await
    }

    /// GET `/1/copy_ref/{root}/{path}`: reference for cross-account
    /// copies.
    pub async fn copy_ref(&self, path: &str) -> Result<Value> {
        self.fetch_json(ApiRequest::get(&self.endpoints.copy_ref).path(self.root, path))
            .await
    }

    /// GET `/1/thumbnails/{root}/{path}`: image thumbnail bytes.
    pub async fn thumbnails(&self, path: &str, options: &ThumbnailOptions) -> Result<Vec<u8>> {
        let request = ApiRequest::get(&self.endpoints.thumbnails)
            .path(self.root, path)
            .params(
                Params::new()
                    .opt("format", options.format.as_deref())
                    .opt("size", options.size.as_deref()),
            );
        self.fetch_bytes(request).await
    }

    /// POST `/1/fileops/copy`.
    pub async fn copy(&self, from_path: &str, to_path: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.fileops_copy).params(
            Params::new()
                .set("root", self.root.as_str())
                .set("from_path", from_path)
                .set("to_path", to_path),
        );
        self.fetch_json(request).await
    }

    /// POST `/1/fileops/copy` from a [`copy_ref`](Client::copy_ref)
    /// instead of a source path.
    pub async fn copy_from_ref(&self, copy_ref: &str, to_path: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.fileops_copy).params(
            Params::new()
                .set("root", self.root.as_str())
                .set("from_copy_ref", copy_ref)
                .set("to_path", to_path),
        );
        self.fetch_json(request).await
    }

    /// POST `/1/fileops/create_folder`.
    pub async fn create_folder(&self, path: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.fileops_create_folder).params(
            Params::new()
                .set("root", self.root.as_str())
                .set("path", path),
        );
        self.fetch_json(request).await
    }

    /// POST `/1/fileops/delete`.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.fileops_delete).params(
            Params::new()
                .set("root", self.root.as_str())
                .set("path", path),
        );
        self.fetch_json(request).await
    }

    /// POST `/1/fileops/move`.
    pub async fn move_file(&self, from_path: &str, to_path: &str) -> Result<Value> {
        let request = ApiRequest::post(&self.endpoints.fileops_move).params(
            Params::new()
                .set("root", self.root.as_str())
                .set("from_path", from_path)
                .set("to_path", to_path),
        );
        self.fetch_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::RequestBody;
    use crate::{Client, Config, Error};
    use std::sync::Arc;

    fn client(transport: Arc<MockTransport>) -> Client<Arc<MockTransport>> {
        let config = Config::new("ck", "cs")
            .api_server("https://api.example.com")
            .token("token", "token-secret", "42");
        Client::with_transport(config, transport).unwrap()
    }

    fn sandbox_client(transport: Arc<MockTransport>) -> Client<Arc<MockTransport>> {
        let config = Config::new("ck", "cs")
            .api_server("https://api.example.com")
            .sandbox_root(true)
            .token("token", "token-secret", "42");
        Client::with_transport(config, transport).unwrap()
    }

    #[tokio::test]
    async fn metadata_omits_unset_parameters() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        let options = MetadataOptions {
            file_limit: Some(25),
            list: Some(false),
            ..Default::default()
        };
        client.metadata("/photos/2012", &options).await.unwrap();

        let seen = transport.requests();
        assert_eq!(
            seen[0].url.as_str(),
            "https://api.example.com/1/metadata/dropbox/photos/2012?file_limit=25&list=false"
        );
        assert!(seen[0].authorization.as_ref().unwrap().starts_with("OAuth "));
        assert!(matches!(seen[0].body, RequestBody::Empty));
    }

    #[tokio::test]
    async fn sandbox_root_reaches_the_path() {
        let transport = Arc::new(MockTransport::new());
        let client = sandbox_client(transport.clone());

        client.metadata("/notes.txt", &Default::default()).await.unwrap();
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api.example.com/1/metadata/sandbox/notes.txt"
        );
    }

    #[tokio::test]
    async fn path_components_are_escaped() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        client
            .metadata("/dossier 2012/r\u{e9}sum\u{e9}.pdf", &Default::default())
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api.example.com/1/metadata/dropbox/dossier%202012/r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[tokio::test]
    async fn put_file_sends_explicit_overwrite_false() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        let options = PutFileOptions {
            overwrite: Some(false),
            ..Default::default()
        };
        client
            .put_file("/notes/todo.txt", b"buy milk".to_vec(), &options)
            .await
            .unwrap();

        let seen = transport.requests();
        assert_eq!(
            seen[0].url.as_str(),
            "https://api-content.example.com/1/files_put/dropbox/notes/todo.txt?overwrite=false"
        );
        match &seen[0].body {
            RequestBody::Binary(contents) => assert_eq!(contents, b"buy milk"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn put_file_omits_unset_overwrite() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        client
            .put_file("/notes/todo.txt", Vec::new(), &Default::default())
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api-content.example.com/1/files_put/dropbox/notes/todo.txt"
        );
    }

    #[tokio::test]
    async fn post_file_uploads_multipart() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        client
            .post_file("/inbox", "scan.pdf", vec![1, 2, 3], &Default::default())
            .await
            .unwrap();

        let seen = transport.requests();
        assert_eq!(
            seen[0].url.as_str(),
            "https://api-content.example.com/1/files/dropbox/inbox"
        );
        match &seen[0].body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.file_name, "scan.pdf");
                assert_eq!(part.contents, vec![1, 2, 3]);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn delta_posts_cursor_as_form_body() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        let options = DeltaOptions {
            cursor: Some("abc123".into()),
            ..Default::default()
        };
        client.delta(&options).await.unwrap();

        let seen = transport.requests();
        assert_eq!(seen[0].url.as_str(), "https://api.example.com/1/delta");
        match &seen[0].body {
            RequestBody::Form(form) => assert_eq!(form, "cursor=abc123"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn fileops_carry_the_root_in_the_form() {
        let transport = Arc::new(MockTransport::new());
        let client = sandbox_client(transport.clone());

        client.move_file("/a.txt", "/b.txt").await.unwrap();

        let seen = transport.requests();
        assert_eq!(
            seen[0].url.as_str(),
            "https://api.example.com/1/fileops/move"
        );
        match &seen[0].body {
            RequestBody::Form(form) => {
                assert_eq!(form, "root=sandbox&from_path=%2Fa.txt&to_path=%2Fb.txt")
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn api_error_status_is_surfaced() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(404, r#"{"error": "File not found"}"#);
        let client = client(transport);

        let err = client
            .metadata("/missing", &Default::default())
            .await
            .unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("File not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn concurrent_sends_sign_independently() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        let metadata_opts = Default::default();
        let search_opts = Default::default();
        let (metadata, search) = tokio::join!(
            client.metadata("/photos", &metadata_opts),
            client.search("/", "report", &search_opts),
        );
        metadata.unwrap();
        search.unwrap();

        let seen = transport.requests();
        assert_eq!(seen.len(), 2);
        for request in &seen {
            let authorization = request.authorization.as_ref().unwrap();
            assert!(authorization.starts_with("OAuth "));
            assert!(authorization.contains("oauth_token=\"token\""));
            assert!(authorization.contains("oauth_signature="));
        }
        let urls: Vec<_> = seen.iter().map(|r| r.url.as_str()).collect();
        assert!(urls.contains(&"https://api.example.com/1/metadata/dropbox/photos"));
        assert!(urls.contains(&"https://api.example.com/1/search/dropbox?query=report"));
    }

    #[tokio::test]
    async fn thumbnails_return_raw_bytes() {
        let transport = Arc::new(MockTransport::new());
        transport.push_ok(200, "not-json\u{1}\u{2}");
        let client = client(transport.clone());

        let options = ThumbnailOptions {
            size: Some("m".into()),
            ..Default::default()
        };
        let bytes = client.thumbnails("/photo.jpg", &options).await.unwrap();
        assert_eq!(bytes, "not-json\u{1}\u{2}".as_bytes());
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api-content.example.com/1/thumbnails/dropbox/photo.jpg?size=m"
        );
    }
}
