pub mod domain;
pub mod fps_probe;
pub mod infrastructure;
pub mod stream_connector;
pub mod stream_handle;
