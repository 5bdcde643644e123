pub mod api_utils;
pub mod components;
pub mod config;
pub mod download;
pub mod error_presenter;
pub mod icons;
pub mod page_frame;
pub mod page_standard;
pub mod toast;
