use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::GenericImageView;
use regex::Regex;

use crate::markdown::tokens::Token;

/// Pre-fetched picture bytes plus pixel dimensions, as handed over by
/// whatever fetched them. Zero dimensions mean "unknown"; layout then
/// assumes a 4:3 box.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Boundary to the image-fetching side. `None` sends the builder down the
/// placeholder path; a failing fetch must never take other images with it.
pub trait ImageProvider {
    fn fetch(&self, src: &str) -> Option<FetchedImage>;
}

/// Provider for conversions that should not touch any external source.
pub struct NoImages;

impl ImageProvider for NoImages {
    fn fetch(&self, _src: &str) -> Option<FetchedImage> {
        None
    }
}

/// Resolves relative references against a base directory, typically the
/// Markdown file's parent. Remote URLs are left to other providers.
pub struct LocalFileProvider {
    base: PathBuf,
}

impl LocalFileProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ImageProvider for LocalFileProvider {
    fn fetch(&self, src: &str) -> Option<FetchedImage> {
        if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:") {
            return None;
        }
        let path = if Path::new(src).is_absolute() {
            PathBuf::from(src)
        } else {
            self.base.join(src)
        };
        match load_image_file(&path) {
            Ok(image) => Some(image),
            Err(reason) => {
                log::warn!("image {src} skipped: {reason}");
                None
            }
        }
    }
}

/// Resolves every distinct non-data image reference up front so building
/// never blocks on I/O. One reference failing only loses that reference.
pub fn prefetch(tokens: &[Token], provider: &dyn ImageProvider) -> HashMap<String, FetchedImage> {
    let mut fetched = HashMap::new();
    for token in tokens {
        if let Token::Image { src, .. } = token {
            if src.starts_with("data:") || fetched.contains_key(src) {
                continue;
            }
            if let Some(image) = provider.fetch(src) {
                fetched.insert(src.clone(), image);
            }
        }
    }
    fetched
}

pub fn load_image_file(path: &Path) -> Result<FetchedImage, String> {
    let ext = path
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .ok_or_else(|| "missing file extension".to_string())?;
    let mime = mime_for_extension(&ext).ok_or_else(|| format!("unsupported image format: {ext}"))?;
    let bytes = fs::read(path).map_err(|e| format!("failed to read image: {e}"))?;
    let (width, height) = probe_dimensions(&bytes)
        .ok_or_else(|| "failed to decode image dimensions".to_string())?;
    Ok(FetchedImage {
        mime: mime.to_string(),
        bytes,
        width,
        height,
    })
}

pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpeg",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        _ => "png",
    }
}

/// Inline `data:` URL to image bytes. WebP and non-image payloads are
/// unsupported by the target format and reported as such; the caller turns
/// the error into a placeholder, never a failed conversion.
pub fn decode_data_url(url: &str) -> Result<FetchedImage, String> {
    let header = Regex::new(r"^data:(?P<mime>[^;,]*)(?P<params>(?:;[^;,]*)*),(?P<payload>.*)$")
        .map_err(|e| format!("data url pattern: {e}"))?;
    let captures = header.captures(url).ok_or("not a data url")?;
    let mime = captures["mime"].to_ascii_lowercase();

    if mime == "image/webp" {
        return Err("webp images are not supported".to_string());
    }
    if !mime.starts_with("image/") {
        return Err(format!("not an image payload: {mime}"));
    }
    if !captures["params"].split(';').any(|part| part == "base64") {
        return Err("data url is not base64-encoded".to_string());
    }

    let bytes = STANDARD
        .decode(captures["payload"].trim().as_bytes())
        .map_err(|e| format!("invalid base64 payload: {e}"))?;
    let (width, height) =
        probe_dimensions(&bytes).ok_or_else(|| "unreadable image data".to_string())?;

    Ok(FetchedImage {
        mime,
        bytes,
        width,
        height,
    })
}

pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::load_from_memory(bytes)
        .ok()
        .map(|img| img.dimensions())
}
