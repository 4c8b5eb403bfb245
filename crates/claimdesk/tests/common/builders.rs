//! Builders for configs and media uploads used across integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use claimdesk::config::{Config, StorageBackend};
use claimdesk::MediaUpload;

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage.backend = backend;
        self
    }

    pub fn data_dir(mut self, path: &Path) -> Self {
        self.config.storage.data_dir = Some(path.display().to_string());
        self
    }

    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.config.media.max_dimension = max_dimension;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}

pub fn photo(name: &str, width: u32, height: u32) -> MediaUpload {
    MediaUpload::new(name, "image/png", png_bytes(width, height), 1_767_225_600_000)
}

pub fn clip(name: &str) -> MediaUpload {
    MediaUpload::new(
        name,
        "video/mp4",
        b"\x00\x00\x00\x18ftypmp42 pretend video".to_vec(),
        1_767_225_600_000,
    )
}

pub fn corrupt_photo(name: &str) -> MediaUpload {
    MediaUpload::new(name, "image/jpeg", b"\xff\xd8 truncated".to_vec(), 0)
}
