//! Transactional email dispatch
//!
//! Provides a unified interface over email providers. Sending never
//! returns an `Err` to the caller: provider failures come back as a
//! discriminated `SendOutcome` so lifecycle operations can log and move on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// A rendered outgoing email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

/// Discriminated send result; provider failures are data, not errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { message_id: Option<String> },
    Failed { error: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }
}

/// Trait for transactional email providers
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email; never returns Err on provider failure
    async fn send(&self, email: OutgoingEmail) -> SendOutcome;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Resend email client
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    from_address: String,
    from_name: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct ResendRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

impl ResendMailer {
    /// Create a new Resend mailer
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        from_address: String,
        from_name: String,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.resend.com".to_string()),
            from_address,
            from_name,
            max_retries,
        }
    }

    fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }

    /// Make request with retry
    async fn request_with_retry(&self, email: &OutgoingEmail) -> Result<String, String> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * (2_u64.pow(attempt)));
                tokio::time::sleep(delay).await;
            }

            match self.make_request(email).await {
                Ok(message_id) => return Ok(message_id),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        error = %e,
                        "Email request failed, retrying"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "Unknown error after retries".to_string()))
    }

    async fn make_request(&self, email: &OutgoingEmail) -> Result<String, String> {
        let url = format!("{}/emails", self.base_url);

        let to = match &email.to_name {
            Some(name) => format!("{} <{}>", name, email.to),
            None => email.to.clone(),
        };

        let request = ResendRequest {
            from: self.sender(),
            to: vec![to],
            subject: email.subject.clone(),
            html: email.html.clone(),
            text: email.text.clone(),
            reply_to: email.reply_to.clone(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        let result: ResendResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(result.id)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> SendOutcome {
        match self.request_with_retry(&email).await {
            Ok(message_id) => SendOutcome::Sent {
                message_id: Some(message_id),
            },
            Err(error) => SendOutcome::Failed { error },
        }
    }

    fn provider_name(&self) -> &str {
        "resend"
    }
}

/// Mock mailer for testing; records sent emails and can be flipped to fail
pub struct MockMailer {
    sent: std::sync::Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Emails sent so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: OutgoingEmail) -> SendOutcome {
        if self.fail {
            return SendOutcome::Failed {
                error: "mock provider failure".to_string(),
            };
        }
        self.sent.lock().unwrap().push(email);
        SendOutcome::Sent { message_id: None }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// Create a mailer based on configuration
pub fn create_mailer(config: &crate::config::EmailConfig) -> Arc<dyn Mailer> {
    match config.provider.as_str() {
        "resend" => {
            let key = config.api_key.clone().unwrap_or_default();
            if key.is_empty() {
                tracing::warn!("Email API key missing, falling back to mock mailer");
                return Arc::new(MockMailer::new());
            }
            Arc::new(ResendMailer::new(
                key,
                config.api_base.clone(),
                config.from_address.clone(),
                config.from_name.clone(),
                config.timeout_secs,
                config.max_retries,
            ))
        }
        "mock" => Arc::new(MockMailer::new()),
        other => {
            tracing::warn!(provider = other, "Unknown email provider, using mock");
            Arc::new(MockMailer::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> OutgoingEmail {
        OutgoingEmail {
            to: "ada@example.org".to_string(),
            to_name: Some("Ada".to_string()),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: Some("Hi".to_string()),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_mock_mailer_records() {
        let mailer = MockMailer::new();
        let outcome = mailer.send(sample_email()).await;
        assert!(outcome.is_sent());
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, "ada@example.org");
    }

    #[tokio::test]
    async fn test_failing_mailer_returns_outcome_not_err() {
        let mailer = MockMailer::failing();
        let outcome = mailer.send(sample_email()).await;
        match outcome {
            SendOutcome::Failed { error } => assert!(error.contains("mock")),
            SendOutcome::Sent { .. } => panic!("expected failure outcome"),
        }
        assert!(mailer.sent().is_empty());
    }

    #[test]
    fn test_create_mailer_falls_back_without_key() {
        let config = crate::config::EmailConfig {
            provider: "resend".to_string(),
            api_key: None,
            api_base: None,
            from_address: "noreply@grantflow.app".to_string(),
            from_name: "GrantFlow".to_string(),
            timeout_secs: 10,
            max_retries: 3,
        };
        let mailer = create_mailer(&config);
        assert_eq!(mailer.provider_name(), "mock");
    }
}
