//! Complaint-desk admin console host: sessions, navigation and guarded views.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod permission_source;
pub mod sessions;
pub mod views;
