pub mod background_sink;
pub mod composite_sink;
pub mod filesystem_sink;
pub mod storage_service_sink;
