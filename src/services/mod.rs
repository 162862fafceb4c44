// Service exports
pub mod auth;
pub mod cache;
pub mod notifier;
pub mod store;

pub use auth::{AuthError, TokenService};
pub use cache::{CacheError, CacheKey, CatalogCache};
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use store::{NewUser, Store, StoreError, UserKind};
