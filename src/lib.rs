pub mod backend;
pub mod config;
pub mod history;
pub mod navigation;
pub mod preferences;
pub mod session;
pub mod storage;
pub mod types;
pub mod ui;
pub mod view;
