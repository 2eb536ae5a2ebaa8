mod checklist_repository;
pub mod client;

pub use checklist_repository::ApiChecklistRepository;
pub use client::{ApiError, HttpClient, RetryConfig, Session, UserProfile};
