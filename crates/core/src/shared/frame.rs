use ndarray::{ArrayView3, ArrayViewMut3};

/// A single decoded frame: contiguous bytes in row-major order.
///
/// Color frames are RGB (3 channels), intensity frames are single-channel.
/// The index is the 1-based position assigned by the processing loop; frames
/// fresh out of a stream reader carry index 0 until stamped.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A frame filled with a single byte value, mostly for fixtures.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Self {
        let len = (width as usize) * (height as usize) * (channels as usize);
        Self::new(vec![value; len], width, height, channels, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the rectangle `[y1, y2) × [x1, x2)` into a new frame.
    ///
    /// Callers are responsible for bounds; the rectangle must lie inside the
    /// frame. The sub-frame keeps this frame's index.
    pub fn sub_frame(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> Frame {
        debug_assert!(x1 <= x2 && x2 <= self.width, "x range out of bounds");
        debug_assert!(y1 <= y2 && y2 <= self.height, "y range out of bounds");

        let channels = self.channels as usize;
        let row_len = (x2 - x1) as usize * channels;
        let stride = self.width as usize * channels;
        let mut data = Vec::with_capacity(row_len * (y2 - y1) as usize);
        for row in y1 as usize..y2 as usize {
            let start = row * stride + x1 as usize * channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Frame::new(data, x2 - x1, y2 - y1, self.channels, self.index)
    }

    /// Converts to an `image` buffer (Luma8 or Rgb8) for encoding and drawing.
    pub fn to_dynamic_image(&self) -> Option<image::DynamicImage> {
        match self.channels {
            1 => image::GrayImage::from_raw(self.width, self.height, self.data.clone())
                .map(image::DynamicImage::ImageLuma8),
            3 => image::RgbImage::from_raw(self.width, self.height, self.data.clone())
                .map(image::DynamicImage::ImageRgb8),
            _ => None,
        }
    }

    pub fn from_gray_image(img: image::GrayImage, index: usize) -> Self {
        let (w, h) = img.dimensions();
        Self::new(img.into_raw(), w, h, 1, index)
    }

    pub fn from_rgb_image(img: image::RgbImage, index: usize) -> Self {
        let (w, h) = img.dimensions();
        Self::new(img.into_raw(), w, h, 3, index)
    }

    /// Gray images stay single-channel; every other layout becomes RGB.
    pub fn from_dynamic_image(img: image::DynamicImage, index: usize) -> Self {
        match img {
            image::DynamicImage::ImageLuma8(gray) => Self::from_gray_image(gray, index),
            other => Self::from_rgb_image(other.to_rgb8(), index),
        }
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
