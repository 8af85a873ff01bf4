//! Stereo image extraction into fixed packed buffers.
//!
//! The adapter owns one [`ImageBuffer`] per camera. Each poll copies the
//! raw IR bytes into them in place and publishes them on the left/right
//! image channels. A buffer keeps its name for its whole life, so a
//! consumer can tell an in-place refresh from a replacement.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::error::{BridgeError, Result};
use crate::model::ImageList;
use crate::protocol::Channel;
use crate::sink::OutputSink;

/// Default sensor image width in pixels.
pub const DEFAULT_WIDTH: u32 = 640;

/// Default sensor image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 240;

/// Counter behind buffer names.
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

fn unique_name() -> String {
    format!("u{}", NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
}

/// A named, tightly packed, single-plane 8-bit 2D buffer.
#[derive(Debug)]
pub struct ImageBuffer {
    name: String,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Allocate a zeroed buffer with a fresh unique name.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            name: unique_name(),
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Re-describe the buffer with new dimensions. The name is kept.
    pub fn reconfigure(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.resize(width as usize * height as usize, 0);
    }

    /// Copy raw pixels in, starting at the first byte.
    pub fn copy_from(&mut self, src: &[u8]) {
        let n = src.len().min(self.data.len());
        self.data[..n].copy_from_slice(&src[..n]);
    }

    /// Owned copy of the current contents.
    pub fn snapshot(&self) -> ImageSnapshot {
        ImageSnapshot {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            data: Bytes::copy_from_slice(&self.data),
        }
    }
}

/// Point-in-time copy of an [`ImageBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSnapshot {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Copies stereo image pairs into the left/right buffers.
#[derive(Debug)]
pub struct ImageChannelAdapter {
    width: u32,
    height: u32,
    buffers: [ImageBuffer; 2],
}

impl ImageChannelAdapter {
    /// Adapter sized for the sensor's default 640x240 images.
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffers: [ImageBuffer::new(width, height), ImageBuffer::new(width, height)],
        }
    }

    /// Current configured dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Buffer for camera index 0 (left) or 1 (right).
    pub fn buffer(&self, index: usize) -> Option<&ImageBuffer> {
        self.buffers.get(index)
    }

    /// Copy the first two images into the buffers and publish them.
    ///
    /// Does nothing when fewer than two images are available. Invalid images
    /// are skipped. Returns how many buffers were published.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedPixelFormat`] as soon as an image
    /// reports more than one byte per pixel; buffers published earlier in
    /// the same call stay published. Sink errors are propagated.
    pub fn extract(&mut self, images: &ImageList, sink: &mut dyn OutputSink) -> Result<usize> {
        if images.count() < 2 {
            return Ok(0);
        }

        let mut published = 0;
        for image in images.iter().take(2) {
            if !image.valid {
                continue;
            }

            let Some(channel) = Channel::image(image.id) else {
                tracing::warn!("Skipping image with unexpected camera id {}", image.id);
                continue;
            };

            if image.width != self.width || image.height != self.height {
                tracing::debug!(
                    "Image dimensions changed from {}x{} to {}x{}",
                    self.width,
                    self.height,
                    image.width,
                    image.height
                );
                self.width = image.width;
                self.height = image.height;
            }

            let buffer = &mut self.buffers[image.id];
            if buffer.width() != self.width || buffer.height() != self.height {
                buffer.reconfigure(self.width, self.height);
            }

            if image.bytes_per_pixel != 1 {
                tracing::error!(
                    "Sensor reports {} bytes per pixel, image output needs 1",
                    image.bytes_per_pixel
                );
                return Err(BridgeError::UnsupportedPixelFormat {
                    bytes_per_pixel: image.bytes_per_pixel,
                });
            }

            if image.data.len() < image.expected_len() {
                tracing::warn!(
                    "Image {} carries {} bytes, expected {}",
                    image.id,
                    image.data.len(),
                    image.expected_len()
                );
                continue;
            }

            buffer.copy_from(&image.data[..image.expected_len()]);
            sink.emit_image(channel, buffer)?;
            published += 1;
        }

        Ok(published)
    }
}

impl Default for ImageChannelAdapter {
    fn default() -> Self {
        Self::new()
    }
}
