//! Shared HTTP plumbing: request retries with bounded backoff.

use crate::defaults::{HTTP_MAX_ATTEMPTS, HTTP_RETRY_BASE_DELAY, HTTP_TIMEOUT};
use crate::error::{FormvaniError, Result};
use std::time::Duration;

/// Should a response status trigger a retry?
///
/// Server errors are assumed transient; client errors are not — a 4xx
/// will come back identical no matter how often we resend.
pub fn should_retry_status(status: u16) -> bool {
    (500..600).contains(&status)
}

/// A reqwest client that retries transient failures.
///
/// Transport errors and 5xx responses are retried up to a bounded number
/// of attempts with doubling delays; 4xx responses fail immediately.
#[derive(Clone)]
pub struct RetryingClient {
    client: reqwest::Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryingClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| FormvaniError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_attempts: HTTP_MAX_ATTEMPTS,
            base_delay: HTTP_RETRY_BASE_DELAY,
        })
    }

    /// Override the retry schedule (tests use this to avoid real delays).
    pub fn with_retry_schedule(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    /// Access the underlying client for building requests.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request, retrying transient failures.
    ///
    /// `build` is called once per attempt because request bodies
    /// (multipart uploads in particular) cannot be reused after a send.
    pub async fn send_with_retry<F>(
        &self,
        service: &str,
        build: F,
    ) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut delay = self.base_delay;
        let mut last_error: Option<FormvaniError> = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::time::sleep(delay).await;
                delay *= 2;
            }

            match build(&self.client).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if !should_retry_status(status.as_u16()) {
                        return Err(FormvaniError::ApiStatus {
                            service: service.to_string(),
                            status: status.as_u16(),
                        });
                    }
                    last_error = Some(FormvaniError::ApiStatus {
                        service: service.to_string(),
                        status: status.as_u16(),
                    });
                }
                Err(e) => {
                    last_error = Some(FormvaniError::api(service, e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FormvaniError::Api {
            service: service.to_string(),
            message: "request failed with no attempts made".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_5xx_statuses_retry() {
        assert!(should_retry_status(500));
        assert!(should_retry_status(502));
        assert!(should_retry_status(503));
        assert!(should_retry_status(599));
    }

    #[test]
    fn test_4xx_statuses_do_not_retry() {
        assert!(!should_retry_status(400));
        assert!(!should_retry_status(401));
        assert!(!should_retry_status(404));
        assert!(!should_retry_status(429));
    }

    #[test]
    fn test_success_statuses_do_not_retry() {
        assert!(!should_retry_status(200));
        assert!(!should_retry_status(204));
    }

    #[test]
    fn test_retry_schedule_floor() {
        let client = RetryingClient::new()
            .unwrap()
            .with_retry_schedule(0, Duration::from_millis(1));
        // At least one attempt always happens.
        assert_eq!(client.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_service_name() {
        // Nothing listens on this port; connection is refused quickly.
        let client = RetryingClient::new()
            .unwrap()
            .with_retry_schedule(2, Duration::from_millis(1));

        let result = client
            .send_with_retry("speech", |c| c.get("http://127.0.0.1:1/unreachable"))
            .await;

        match result {
            Err(FormvaniError::Api { service, .. }) => assert_eq!(service, "speech"),
            other => panic!("Expected Api error, got {:?}", other.map(|_| ())),
        }
    }
}
