pub mod status_manager;
