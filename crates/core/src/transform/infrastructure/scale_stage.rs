use fast_image_resize as fr;
use image::imageops::FilterType;

use crate::shared::frame::Frame;
use crate::shared::validation_error::ValidationError;
use crate::transform::domain::transform_stage::{TransformError, TransformStage};

/// Multiplies both frame dimensions by a fixed factor.
///
/// Target size is `round(width * factor) x round(height * factor)`. Shrinking
/// uses area averaging, enlarging uses bilinear interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleStage {
    factor: f64,
}

impl ScaleStage {
    pub fn new(factor: f64) -> Result<Self, ValidationError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ValidationError::InvalidScale(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Output dimensions for an input of the given size.
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            (width as f64 * self.factor).round() as u32,
            (height as f64 * self.factor).round() as u32,
        )
    }
}

impl TransformStage for ScaleStage {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn apply(&self, frame: Frame) -> Result<Frame, TransformError> {
        let (w, h) = (frame.width(), frame.height());
        let (tw, th) = self.target_size(w, h);
        if tw == 0 || th == 0 {
            return Err(TransformError::EmptyOutput {
                stage: self.name(),
                width: w,
                height: h,
            });
        }
        if (tw, th) == (w, h) {
            return Ok(frame);
        }

        if tw <= w && th <= h {
            self.shrink(&frame, tw, th)
        } else {
            self.enlarge(&frame, tw, th)
        }
    }
}

impl ScaleStage {
    /// Box convolution, the area average over each covered source region.
    fn shrink(&self, frame: &Frame, tw: u32, th: u32) -> Result<Frame, TransformError> {
        let pixel_type = match frame.channels() {
            1 => fr::PixelType::U8,
            3 => fr::PixelType::U8x3,
            channels => return Err(self.unsupported(channels)),
        };
        let src = fr::images::ImageRef::new(frame.width(), frame.height(), frame.data(), pixel_type)
            .map_err(|e| self.resize_failed(e))?;
        let mut dst = fr::images::Image::new(tw, th, pixel_type);

        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Box));
        fr::Resizer::new()
            .resize(&src, &mut dst, Some(&options))
            .map_err(|e| self.resize_failed(e))?;

        Ok(Frame::new(dst.buffer().to_vec(), tw, th, frame.channels(), frame.index()))
    }

    fn enlarge(&self, frame: &Frame, tw: u32, th: u32) -> Result<Frame, TransformError> {
        let img = frame
            .to_dynamic_image()
            .ok_or_else(|| self.unsupported(frame.channels()))?;
        let resized = img.resize_exact(tw, th, FilterType::Triangle);
        Ok(Frame::from_dynamic_image(resized, frame.index()))
    }

    fn unsupported(&self, channels: u8) -> TransformError {
        TransformError::UnsupportedChannels {
            stage: self.name(),
            channels,
        }
    }

    fn resize_failed(&self, err: impl std::fmt::Display) -> TransformError {
        TransformError::Resize {
            stage: self.name(),
            message: err.to_string(),
        }
    }
}
