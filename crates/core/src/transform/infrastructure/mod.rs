pub mod canny_stage;
pub mod crop_stage;
pub mod gray_to_rgb_stage;
pub mod scale_stage;
