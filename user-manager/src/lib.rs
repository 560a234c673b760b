pub mod cache;
pub mod client;
mod config;
mod endpoint;
mod error;
mod limiter;
mod manager;
mod r#static;
mod storage;
mod user;


pub use cache::{CacheStats, Cacheable, LruCache};
pub use client::{RemoteCaller, SurfRemoteCaller, TransportError};
pub use config::{ConfigError, ManagerConfig, ENV_PREFIX};
pub use endpoint::{HttpMethod, Request, UserEndpoint};
pub use error::{Operation, UserManagerError};
pub use limiter::{RequestLimiter, RequestPermit};
pub use manager::UserManager;
pub use storage::UserStorage;
pub use user::{User, UserCreationParams, UserListResponse, UserResponse, UserUpdateParams};
