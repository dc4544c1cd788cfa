//! Transform URL builder
//!
//! Builds public `/image/{key}` URLs carrying on-the-fly transform
//! parameters. The builder is pure: no I/O, no authentication, and no
//! range validation (the backend rejects values it cannot render).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use url::Url;

use super::errors::DomainError;

/// Output format requested from the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Keep whatever the backend serves by default (parameter omitted)
    #[default]
    Original,
    Jpg,
    Png,
    Webp,
    Avif,
}

impl ImageFormat {
    /// Query token sent as `fmt`; empty for [`ImageFormat::Original`]
    pub fn as_token(&self) -> &'static str {
        match self {
            ImageFormat::Original => "",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for ImageFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(ImageFormat::Original),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            "avif" => Ok(ImageFormat::Avif),
            other => Err(DomainError::InvalidFormat(other.to_string())),
        }
    }
}

/// Width/height/quality/format controls for a rendered image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    pub format: ImageFormat,
}

impl TransformParams {
    /// Parameters for a fixed-width gallery thumbnail
    pub fn thumbnail(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Query pairs in `w`, `h`, `q`, `fmt` order, skipping unset values
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(w) = self.width {
            pairs.push(("w", w.to_string()));
        }
        if let Some(h) = self.height {
            pairs.push(("h", h.to_string()));
        }
        if let Some(q) = self.quality {
            pairs.push(("q", q.to_string()));
        }
        if self.format != ImageFormat::Original {
            pairs.push(("fmt", self.format.as_token().to_string()));
        }
        pairs
    }
}

/// Resolves path segments against a base URL
///
/// The base URL's own path prefix is kept and every segment is
/// percent-encoded, so keys containing `/`, `?`, `#` or spaces stay a
/// single segment.
pub fn resolve_endpoint(base_url: &str, segments: &[&str]) -> Result<Url, DomainError> {
    let base = base_url.trim();
    if base.is_empty() {
        return Err(DomainError::BaseUrlNotSet);
    }

    let mut url = Url::parse(base).map_err(|e| DomainError::InvalidBaseUrl(format!("{base}: {e}")))?;
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| DomainError::InvalidBaseUrl(format!("{base}: cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Builds the public transform URL for `key`
pub fn build_image_url(
    base_url: &str,
    key: &str,
    params: &TransformParams,
) -> Result<String, DomainError> {
    let mut url = resolve_endpoint(base_url, &["image", key])?;

    let pairs = params.query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url.into())
}
