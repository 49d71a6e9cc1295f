pub mod domain;
pub mod frame_transform_pipeline;
pub mod infrastructure;
