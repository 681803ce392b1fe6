#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod error;
pub mod progress_service;

pub use learnhub_core::Clock;

pub use account_service::AccountService;
pub use app_services::AppServices;
pub use error::{AccountError, AppServicesError, ProgressError};
pub use progress_service::{CourseProgress, CourseStats, ProgressService};
