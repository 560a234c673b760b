pub mod surf_logging;
pub mod target_url;
