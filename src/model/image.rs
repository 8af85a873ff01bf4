//! Raw stereo IR images as delivered by the source.

use bytes::Bytes;

/// Index of the left camera image.
pub const LEFT: usize = 0;
/// Index of the right camera image.
pub const RIGHT: usize = 1;

/// One camera image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Camera index: [`LEFT`] or [`RIGHT`].
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
    /// Row-major pixel data, `width * height * bytes_per_pixel` bytes.
    pub data: Bytes,
    pub valid: bool,
}

impl Image {
    pub fn new(id: usize, width: u32, height: u32, data: Bytes) -> Self {
        Self {
            id,
            width,
            height,
            bytes_per_pixel: 1,
            data,
            valid: true,
        }
    }

    /// Byte length the dimensions describe.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel as usize
    }
}

/// The images captured with one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageList(pub Vec<Image>);

impl ImageList {
    pub fn new(images: Vec<Image>) -> Self {
        Self(images)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Image> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.0.iter()
    }
}
