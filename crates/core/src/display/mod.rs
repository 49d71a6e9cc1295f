pub mod box_overlay;
pub mod domain;
pub mod infrastructure;
