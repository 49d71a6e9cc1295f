pub mod snapshot_file_display;
