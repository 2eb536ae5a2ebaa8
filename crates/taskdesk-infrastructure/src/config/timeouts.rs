use std::time::Duration;

/// Timeouts applied to calls against the portal API
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Whole-request timeout, including reading the body
    pub http_request: Duration,

    /// TCP/TLS connect timeout
    pub connect: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        GLOBAL_TIMEOUT_CONFIG.clone()
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_request(mut self, timeout: Duration) -> Self {
        self.http_request = timeout;
        self
    }

    /// Get the global timeout configuration
    pub fn global() -> &'static Self {
        &GLOBAL_TIMEOUT_CONFIG
    }
}

// The backend is on a free-tier host that cold-starts; keep the request
// timeout generous.
static GLOBAL_TIMEOUT_CONFIG: TimeoutConfig = TimeoutConfig {
    http_request: Duration::from_secs(30),
    connect: Duration::from_secs(10),
};
