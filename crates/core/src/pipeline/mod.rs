pub mod capture_config;
pub mod capture_session;
pub mod frame_processing_loop;
pub mod loop_state;
pub mod pipeline_error;
pub mod pipeline_logger;
pub mod snapshot_use_case;
