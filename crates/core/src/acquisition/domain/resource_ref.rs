use std::path::{Path, PathBuf};

use reqwest::Url;

/// What an input is expected to contain. Decides the fallback suffix of a
/// downloaded file so decoders can recognize it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn default_suffix(self) -> &'static str {
        match self {
            MediaKind::Video => ".mp4",
            MediaKind::Image => ".jpg",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Image => write!(f, "image"),
        }
    }
}

/// A parsed resource identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRef {
    Local(PathBuf),
    Remote(Url),
}

impl ResourceRef {
    /// Classifies an identifier. Only `http` and `https` URLs are remote;
    /// `file://` URLs become local paths and anything that isn't a URL
    /// (including `C:\...` drive paths, which parse with scheme `c`) is a
    /// path.
    pub fn parse(identifier: &str) -> Self {
        match Url::parse(identifier) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => ResourceRef::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => ResourceRef::Local(path),
                Err(()) => ResourceRef::Local(PathBuf::from(identifier)),
            },
            _ => ResourceRef::Local(PathBuf::from(identifier)),
        }
    }

    /// Joins relative local paths onto `media_root`.
    pub fn resolve_against(self, media_root: Option<&Path>) -> Self {
        match (self, media_root) {
            (ResourceRef::Local(path), Some(root)) if path.is_relative() => {
                ResourceRef::Local(root.join(path))
            }
            (other, _) => other,
        }
    }
}

/// Suffix for a downloaded file: the URL's own extension when it looks
/// like one, otherwise the kind's default.
pub fn download_suffix(url: &Url, kind: MediaKind) -> String {
    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => kind.default_suffix().to_string(),
    }
}
