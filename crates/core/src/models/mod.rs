pub mod analytics;
pub mod presets;
pub mod profile;
pub mod query;
pub mod session;
pub mod settings;
pub mod subscription;
pub mod transfer;
