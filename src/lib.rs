pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod i18n;
pub mod loading;
pub mod navigation;
pub mod routes;
pub mod settings;

pub use error::InitError;
