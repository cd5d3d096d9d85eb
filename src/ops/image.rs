use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Error type for image attachment
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("could not read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not a supported image file: {0}")]
    UnsupportedType(PathBuf),
}

/// MIME type for an image path, by extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read a local image file and encode it as a data URI for a project's `img`.
pub fn encode_file(path: &Path) -> Result<String, ImageError> {
    let mime = mime_for_path(path).ok_or_else(|| ImageError::UnsupportedType(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|e| ImageError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoded image");
    Ok(to_data_uri(mime, &bytes))
}

/// Size of the decoded payload of a base64 data URI, for display.
pub fn data_uri_size(uri: &str) -> Option<usize> {
    let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    STANDARD.decode(payload).ok().map(|b| b.len())
}
