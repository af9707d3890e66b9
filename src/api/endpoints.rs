//! Endpoint paths of the drive API.

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/login";

/// Registration endpoint.
pub const REGISTER_PATH: &str = "/api/register";

/// Listing of the drive root.
pub const FILES_PATH: &str = "/api/files";

/// Folder creation endpoint.
pub const FOLDER_PATH: &str = "/api/folder";

/// Upload endpoint.
pub const UPLOAD_PATH: &str = "/api/upload";

/// Whether a request to `path` gets the bearer token.
///
/// Only the exact login and register paths are exempt. The comparison is
/// plain string equality, so `/api/login/` or `/api/login?next=x` are not
/// exempt and do carry the token.
pub fn requires_auth(path: &str) -> bool {
    path != LOGIN_PATH && path != REGISTER_PATH
}

fn with_id(prefix: &str, id: &str) -> String {
    format!("{}/{}", prefix, urlencoding::encode(id))
}

/// Path of a folder listing.
pub fn folder(id: &str) -> String {
    with_id("/api/folder", id)
}

/// Listing path for an optional folder; `None` is the drive root.
pub fn listing(folder_id: Option<&str>) -> String {
    match folder_id {
        Some(id) => folder(id),
        None => FILES_PATH.to_string(),
    }
}

/// Path of a file download.
pub fn download(id: &str) -> String {
    with_id("/api/download", id)
}

/// Path of a file preview lookup.
pub fn preview(id: &str) -> String {
    with_id("/api/preview", id)
}

/// Path of a rename.
pub fn rename(id: &str) -> String {
    with_id("/api/rename", id)
}
