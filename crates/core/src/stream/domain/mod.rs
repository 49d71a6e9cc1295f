pub mod stream_opener;
pub mod video_stream;
