pub mod admin;
pub mod app;
pub mod effects;
pub mod logging;
pub mod picker;
pub mod settings;
pub mod ui;
