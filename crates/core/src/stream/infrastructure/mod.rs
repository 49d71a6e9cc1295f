pub mod ffmpeg_stream;
