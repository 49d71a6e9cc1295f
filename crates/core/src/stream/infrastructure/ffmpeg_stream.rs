use std::time::Duration;

use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::stream::domain::stream_opener::{OpenError, StreamOpener};
use crate::stream::domain::video_stream::{ReadError, VideoStream};

const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens files, capture devices and network URLs through libavformat.
///
/// RTSP sources are forced onto TCP transport; every network source gets a
/// socket timeout so a camera that drops off the network surfaces as a read
/// error instead of blocking the loop forever.
pub struct FfmpegStreamOpener {
    timeout: Duration,
}

impl FfmpegStreamOpener {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_SOCKET_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FfmpegStreamOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamOpener for FfmpegStreamOpener {
    fn open(&mut self, source: &str) -> Result<Box<dyn VideoStream>, OpenError> {
        Ok(Box::new(FfmpegStream::open(source, self.timeout)?))
    }
}

/// A pull-based decoder over one video stream of an ffmpeg input.
///
/// Each decoded frame is converted to RGB24. The scaler is built from the
/// first decoded frame and rebuilt if the stream changes resolution.
pub struct FfmpegStream {
    input: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<scaling::Context>,
    video_stream_index: usize,
    metadata: StreamMetadata,
    flushing: bool,
    done: bool,
}

// Safety: FfmpegStream is owned by a single loop thread at a time.
// The raw pointers inside ffmpeg types are never shared across threads.
unsafe impl Send for FfmpegStream {}

impl FfmpegStream {
    pub fn open(source: &str, timeout: Duration) -> Result<Self, OpenError> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input_with_dictionary(source, input_options(source, timeout))?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("no video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let fps = rational_to_f64(stream.rate())
            .or_else(|| rational_to_f64(stream.avg_frame_rate()))
            .unwrap_or(0.0);

        let metadata = StreamMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source: source.to_string(),
        };

        Ok(Self {
            input: Some(ictx),
            decoder: Some(decoder),
            scaler: None,
            video_stream_index,
            metadata,
            flushing: false,
            done: false,
        })
    }
}

impl VideoStream for FfmpegStream {
    fn is_opened(&self) -> bool {
        self.input.is_some()
    }

    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    fn read(&mut self) -> Result<Option<Frame>, ReadError> {
        let (Some(input), Some(decoder)) = (self.input.as_mut(), self.decoder.as_mut()) else {
            return Err(ReadError::Closed);
        };
        if self.done {
            return Ok(None);
        }

        loop {
            if let Some(frame) = receive_frame(decoder, &mut self.scaler)? {
                return Ok(Some(frame));
            }
            if self.flushing {
                self.done = true;
                return Ok(None);
            }

            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(input) {
                Ok(()) => {
                    if packet.stream() != self.video_stream_index {
                        continue;
                    }
                    if let Err(e) = decoder.send_packet(&packet) {
                        log::debug!("Dropping undecodable packet: {e}");
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    let _ = decoder.send_eof();
                    self.flushing = true;
                }
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
                    continue;
                }
                Err(e) => return Err(ReadError::Disconnected(e.to_string())),
            }
        }
    }

    fn close(&mut self) {
        self.scaler = None;
        self.decoder = None;
        self.input = None;
    }
}

fn input_options(source: &str, timeout: Duration) -> ffmpeg_next::Dictionary<'static> {
    let mut options = ffmpeg_next::Dictionary::new();
    let lower = source.to_ascii_lowercase();
    let micros = timeout.as_micros().to_string();

    if lower.starts_with("rtsp://") || lower.starts_with("rtsps://") {
        options.set("rtsp_transport", "tcp");
        options.set("timeout", &micros);
    } else if lower.contains("://") && !lower.starts_with("file://") {
        options.set("rw_timeout", &micros);
    }
    options
}

fn rational_to_f64(rate: ffmpeg_next::Rational) -> Option<f64> {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        None
    } else {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    }
}

/// Pulls one decoded frame out of the decoder, if any is ready.
fn receive_frame(
    decoder: &mut ffmpeg_next::decoder::Video,
    scaler: &mut Option<scaling::Context>,
) -> Result<Option<Frame>, ReadError> {
    let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
    if decoder.receive_frame(&mut decoded).is_err() {
        return Ok(None);
    }

    let width = decoded.width();
    let height = decoded.height();
    let stale = scaler.as_ref().map_or(true, |s| {
        let def = s.input();
        def.width != width || def.height != height || def.format != decoded.format()
    });
    if stale {
        let ctx = scaling::Context::get(
            decoded.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| ReadError::Decode(e.to_string()))?;
        *scaler = Some(ctx);
    }
    let scaler = scaler
        .as_mut()
        .ok_or_else(|| ReadError::Decode("scaler unavailable".to_string()))?;

    let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
    scaler
        .run(&decoded, &mut rgb_frame)
        .map_err(|e| ReadError::Decode(e.to_string()))?;

    let pixels = extract_rgb_pixels(&rgb_frame, width, height);
    Ok(Some(Frame::new(pixels, width, height, 3, 0)))
}

/// Copies pixel data from an ffmpeg frame into a tightly packed RGB buffer,
/// dropping the per-row padding (stride > width * 3).
fn extract_rgb_pixels(rgb_frame: &ffmpeg_next::util::frame::video::Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
