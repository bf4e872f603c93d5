use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on the preview's longest edge. Pictures already within it
/// are kept at their native size.
const PREVIEW_EDGE: u32 = 160;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{0} is not recognized as an image file")]
    NotAnImage(String),
    #[error("failed to read {name}: {source}")]
    Read { name: String, source: io::Error },
}

/// Payload for the frame's image endpoint. Field names and the bare base64
/// `data` encoding are what the frame server expects.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectedImage {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub size: u64,
    pub data: String,
}

/// A file read from disk, with whatever could be decoded from it. The bytes
/// are kept as the wire payload even when decoding fails, so a file the
/// terminal cannot preview can still be sent to the frame.
#[derive(Clone)]
pub struct LoadedPicture {
    pub image: SelectedImage,
    pub dimensions: Option<(u32, u32)>,
    pub preview: Option<Arc<DynamicImage>>,
}

impl fmt::Debug for LoadedPicture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPicture")
            .field("name", &self.image.name)
            .field("mime", &self.image.mime)
            .field("size", &self.image.size)
            .field("dimensions", &self.dimensions)
            .field("preview", &self.preview.is_some())
            .finish()
    }
}

pub fn load(path: &Path) -> Result<LoadedPicture, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let format = ImageFormat::from_path(path).map_err(|_| LoadError::NotAnImage(name.clone()))?;
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        name: name.clone(),
        source,
    })?;
    let decoded = image::load_from_memory_with_format(&bytes, format).ok();
    Ok(LoadedPicture {
        image: SelectedImage {
            name,
            mime: format.to_mime_type().into(),
            size: bytes.len() as u64,
            data: STANDARD.encode(&bytes),
        },
        dimensions: decoded.as_ref().map(|image| image.dimensions()),
        preview: decoded.map(|image| {
            if image.width() > PREVIEW_EDGE || image.height() > PREVIEW_EDGE {
                Arc::new(image.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE))
            } else {
                Arc::new(image)
            }
        }),
    })
}
