pub mod transform_stage;
