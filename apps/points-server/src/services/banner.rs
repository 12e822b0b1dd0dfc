//! Welcome banner loading.

use std::path::Path;

use tokio::fs;

use crate::services::qr::data_url;

/// A banner image ready to embed in the page.
#[derive(Debug, Clone)]
pub struct Banner {
    /// MIME type sniffed from the image content.
    pub mime: &'static str,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl Banner {
    /// Returns the banner as an inline `data:` URL.
    pub fn data_url(&self) -> String {
        data_url(self.mime, &self.bytes)
    }
}

/// Errors that can occur while loading the banner.
#[derive(Debug, thiserror::Error)]
pub enum BannerError {
    /// The file could not be read.
    #[error("Cannot read banner: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a recognized image.
    #[error("Banner is not an image: {0}")]
    NotAnImage(#[from] image::ImageError),
}

/// Loads the banner at `path`.
///
/// Callers are expected to downgrade any failure to a warning.
pub async fn load_banner(path: &Path) -> Result<Banner, BannerError> {
    let bytes = fs::read(path).await?;
    let format = image::guess_format(&bytes)?;

    Ok(Banner {
        mime: format.to_mime_type(),
        bytes,
    })
}
