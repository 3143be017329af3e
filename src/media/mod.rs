pub mod handle;

use std::{
    collections::{hash_map::DefaultHasher, HashMap},
    hash::{Hash, Hasher},
};

use image::ImageFormat;
use webster_shared::media::MediaRef;

use crate::Error;

/// Uploads may be at most 50MB.
pub const MAX_SIZE: usize = 50_000_000;

/// Something that accepts uploaded bytes and hands out references to them.
pub trait Uploader {
    /// Stores an upload and returns its reference.
    ///
    /// # Errors
    ///
    /// - Errors if the bytes are too large or not an image.
    fn upload(&mut self, uploader: u64, bytes: &[u8]) -> Result<MediaRef, Error>;
}

/// An uploaded blob.
#[derive(Debug)]
pub struct Blob {
    pub mime: mime::Mime,
    /// The account that uploaded this blob.
    pub uploader: u64,
    pub bytes: Vec<u8>,
}

/// Uploaded blobs by content hash.
#[derive(Debug, Default)]
pub struct MediaStore {
    blobs: HashMap<u64, Blob>,
}

impl MediaStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, hash: u64) -> Option<&Blob> {
        self.blobs.get(&hash)
    }

    /// The reference of an uploaded blob.
    pub fn reference(&self, hash: u64) -> Option<MediaRef> {
        self.get(hash).map(|blob| MediaRef {
            hash,
            mime: blob.mime.to_string(),
        })
    }

    /// Keeps a checked upload. Bytes uploaded before keep their first uploader.
    pub fn insert(&mut self, uploader: u64, upload: Upload) -> MediaRef {
        let media = upload.reference();
        self.blobs.entry(upload.hash).or_insert(Blob {
            mime: upload.mime,
            uploader,
            bytes: upload.bytes,
        });
        media
    }
}

impl Uploader for MediaStore {
    #[inline]
    fn upload(&mut self, uploader: u64, bytes: &[u8]) -> Result<MediaRef, Error> {
        Ok(self.insert(uploader, Upload::new(bytes.to_vec())?))
    }
}

/// Uploaded bytes checked to be a supported image, with their content hash.
///
/// Building one decodes the image, so it is done before locking the store.
#[derive(Debug)]
pub struct Upload {
    hash: u64,
    mime: mime::Mime,
    bytes: Vec<u8>,
}

impl Upload {
    /// # Errors
    ///
    /// - Errors if the bytes are too large or not an image.
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.len() > MAX_SIZE {
            return Err(Error::MediaTooLarge(bytes.len()));
        }

        let format = image::guess_format(&bytes).map_err(|_| Error::UnsupportedMedia)?;
        let mime = mime_of(format).ok_or(Error::UnsupportedMedia)?;
        image::load_from_memory_with_format(&bytes, format)?;

        let hash = {
            let mut hasher = DefaultHasher::new();
            bytes.hash(&mut hasher);
            hasher.finish()
        };
        Ok(Self { hash, mime, bytes })
    }

    #[inline]
    pub fn reference(&self) -> MediaRef {
        MediaRef {
            hash: self.hash,
            mime: self.mime.to_string(),
        }
    }
}

fn mime_of(format: ImageFormat) -> Option<mime::Mime> {
    match format {
        ImageFormat::Png => Some(mime::IMAGE_PNG),
        ImageFormat::Jpeg => Some(mime::IMAGE_JPEG),
        ImageFormat::Gif => Some(mime::IMAGE_GIF),
        ImageFormat::Bmp => Some(mime::IMAGE_BMP),
        ImageFormat::WebP => "image/webp".parse().ok(),
        _ => None,
    }
}
