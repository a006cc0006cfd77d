use crate::Config;

/// Fully-qualified endpoint base URLs, computed once at construction.
///
/// Bases are kept as strings; a malformed server base is the caller's
/// responsibility and surfaces later as a transport failure when the
/// dispatcher parses the final request URL.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    // OAuth legs
    pub request_token: String,
    pub authorize: String,
    pub access_token: String,
    // API server
    pub account_info: String,
    pub metadata: String,
    pub delta: String,
    pub revisions: String,
    pub restore: String,
    pub search: String,
    pub shares: String,
    pub media: String,
    pub copy_ref: String,
    pub fileops_copy: String,
    pub fileops_create_folder: String,
    pub fileops_delete: String,
    pub fileops_move: String,
    // file-content server
    pub files: String,
    pub files_put: String,
    pub thumbnails: String,
}

impl Endpoints {
    pub(crate) fn derive(config: &Config) -> Self {
        let api = config.api_server.trim_end_matches('/').to_string();
        let auth = config
            .auth_server
            .as_ref()
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| swap_leading_label(&api, |_| "www".to_string()));
        let content = config
            .file_server
            .as_ref()
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| swap_leading_label(&api, |label| format!("{}-content", label)));

        Endpoints {
            request_token: format!("{}/1/oauth/request_token", api),
            authorize: format!("{}/1/oauth/authorize", auth),
            access_token: format!("{}/1/oauth/access_token", api),
            account_info: format!("{}/1/account/info", api),
            metadata: format!("{}/1/metadata", api),
            delta: format!("{}/1/delta", api),
            revisions: format!("{}/1/revisions", api),
            restore: format!("{}/1/restore", api),
            search: format!("{}/1/search", api),
            shares: format!("{}/1/shares", api),
            media: format!("{}/1/media", api),
            copy_ref: format!("{}/1/copy_ref", api),
            fileops_copy: format!("{}/1/fileops/copy", api),
            fileops_create_folder: format!("{}/1/fileops/create_folder", api),
            fileops_delete: format!("{}/1/fileops/delete", api),
            fileops_move: format!("{}/1/fileops/move", api),
            files: format!("{}/1/files", content),
            files_put: format!("{}/1/files_put", content),
            thumbnails: format!("{}/1/thumbnails", content),
        }
    }
}

/// Replace the leading host label (`api` in `https://api.example.com`).
///
/// A base without a dotted host is returned unchanged; overrides are
/// expected for such setups.
fn swap_leading_label<F>(base: &str, replace: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let (scheme, host) = match base.find("://") {
        Some(idx) => base.split_at(idx + 3),
        None => return base.to_string(),
    };
    match host.find('.') {
        Some(dot) => format!("{}{}{}", scheme, replace(&host[..dot]), &host[dot..]),
        None => base.to_string(),
    }
}
