pub mod bounding_box;
pub mod constants;
pub mod frame;
pub mod jpeg;
pub mod model_resolver;
pub mod stream_metadata;
pub mod validation_error;
