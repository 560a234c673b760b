pub const API_VERSION: &str = "v3";
pub const DEFAULT_BASE_URL: &str = "https://api-{app_id}.sendbird.com";

pub const DEFAULT_CACHE_CAPACITY: usize = 10;
pub const MAX_CONCURRENT_REQUESTS: usize = 10;
/// Batches of this size or larger are rejected.
pub const MAX_BULK_CREATE: usize = 10;
pub const LIST_LIMIT: usize = 100;
pub const CREATE_DELAY_MS: u64 = 1_000;
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

pub const API_TOKEN_HEADER: &str = "Api-Token";
