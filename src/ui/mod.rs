pub mod app;
pub mod game;
pub mod menu;
pub mod modals;
pub mod settings;
pub mod settings_io;
