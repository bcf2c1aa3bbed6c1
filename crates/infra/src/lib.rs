//! Infrastructure layer: document storage, services, notifications, config.

pub mod config;
pub mod notify;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use notify::{BroadcastNotifier, Notification, Notifier, TracingNotifier};
pub use services::{ServiceError, ServiceResult, Services};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
