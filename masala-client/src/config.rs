//! Client configuration

use std::time::Duration;

/// Reconnect backoff policy
///
/// 基础延迟按次倍增，封顶 `max_delay`；连续失败超过 `max_retries`
/// 进入终态 GaveUp，不再重试。
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_retries: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 10,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (0-based): base × 2^attempt,
    /// capped at `max_delay`. Non-decreasing in `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Session token (absent for the customer-facing flow)
    pub token: Option<String>,
    /// Reconnect backoff policy for the realtime stream
    pub reconnect: ReconnectPolicy,
    /// Polling-fallback interval while the stream is down
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            reconnect: ReconnectPolicy::default(),
            poll_interval: Duration::from_secs(10),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// URL of the realtime SSE endpoint
    pub fn realtime_url(&self) -> String {
        format!("{}/api/orders/realtime", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ReconnectPolicy {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 10,
        };
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(16));
        // Capped from here on
        assert_eq!(policy.delay_for(5), Duration::from_secs(30));
        assert_eq!(policy.delay_for(20), Duration::from_secs(30));
    }

    #[test]
    fn backoff_is_non_decreasing() {
        let policy = ReconnectPolicy::default();
        let mut last = Duration::ZERO;
        for attempt in 0..32 {
            let delay = policy.delay_for(attempt);
            assert!(delay >= last, "delay decreased at attempt {}", attempt);
            last = delay;
        }
    }

    #[test]
    fn realtime_url_handles_trailing_slash() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(
            config.realtime_url(),
            "http://localhost:3000/api/orders/realtime"
        );
    }
}
