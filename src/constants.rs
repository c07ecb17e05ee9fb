use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.globalping.io/v1";
pub const DEFAULT_LOCATION: &str = "world";
pub const DEFAULT_LIMIT: u32 = 1;

/// Total request timeout, including reading the body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Delay between two polls of an in-progress measurement.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub const USER_AGENT: &str = concat!("globalping-cli/", env!("CARGO_PKG_VERSION"));
