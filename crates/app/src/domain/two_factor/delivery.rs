//! Out-of-band delivery of one-time codes.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroize;

use crate::config::DeliveryConfig;

/// Channel that carries a message to a phone number or similar target.
#[automock]
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn send(&self, target: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway refused the message.
    #[error("message rejected by gateway: {0}")]
    Rejected(String),
}

/// Delivery credentials are absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{0} must be set")]
    MissingCredential(&'static str),

    #[error("no delivery channel is configured")]
    DeliveryUnavailable,
}

/// Gateway auth token; redacted in debug output and wiped on drop.
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(**redacted**)")
    }
}

impl Drop for AuthToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Validated SMS gateway credentials.
#[derive(Debug, Clone)]
pub struct DeliveryCredentials {
    pub account_sid: String,
    pub auth_token: AuthToken,
    pub from_phone: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl DeliveryCredentials {
    /// Validate the delivery section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or blank credential.
    pub fn from_config(config: &DeliveryConfig) -> Result<Self, ConfigurationError> {
        let account_sid = non_blank(config.account_sid.as_deref())
            .ok_or(ConfigurationError::MissingCredential("TWILIO_ACCOUNT_SID"))?;

        let auth_token = non_blank(config.auth_token.as_deref())
            .ok_or(ConfigurationError::MissingCredential("TWILIO_AUTH_TOKEN"))?;

        Ok(Self {
            account_sid: account_sid.to_string(),
            auth_token: AuthToken::new(auth_token.to_string()),
            from_phone: config.from_phone.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// HTTP client for the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct SmsGatewayClient {
    credentials: DeliveryCredentials,
    http: Client,
}

impl SmsGatewayClient {
    /// Build a client whose requests give up after `credentials.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(credentials: DeliveryCredentials) -> Result<Self, DeliveryError> {
        let http = Client::builder().timeout(credentials.timeout).build()?;

        Ok(Self { credentials, http })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.credentials.api_base, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl CodeDelivery for SmsGatewayClient {
    #[tracing::instrument(name = "two_factor.delivery.send", skip(self, body), err)]
    async fn send(&self, target: &str, body: &str) -> Result<(), DeliveryError> {
        let form = [
            ("To", target),
            ("From", self.credentials.from_phone.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_sid,
                Some(self.credentials.auth_token.expose()),
            )
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(DeliveryError::Rejected(format!(
                "send request failed with status {status}: {text}"
            )));
        }

        let parsed: MessageResponse = response.json().await?;

        debug!(message_sid = %parsed.sid, status = %parsed.status, "message queued");

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,

    #[serde(default)]
    status: String,
}
