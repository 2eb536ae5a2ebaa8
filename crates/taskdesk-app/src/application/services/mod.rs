mod auth_service;
mod checklist_service;
mod config_service;

pub use auth_service::AuthService;
pub use checklist_service::{ChecklistService, ChecklistSnapshot};
pub use config_service::{AppConfig, ConfigService, LogLevel, TOKEN_ENV};
