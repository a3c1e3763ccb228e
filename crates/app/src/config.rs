//! Application configuration
//!
//! Every setting can come from a flag or its environment variable; a `.env`
//! file is loaded first when present.

use std::fmt;

use clap::Args;

use crate::domain::tombstones::records::TombstoneAmbiguityPolicy;

/// All runtime settings.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// One-time code delivery settings.
    #[command(flatten)]
    pub delivery: DeliveryConfig,

    /// Tombstone restore settings.
    #[command(flatten)]
    pub tombstones: TombstoneConfig,
}

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// SMS gateway settings. Credentials are optional here and validated once at
/// startup.
#[derive(Clone, Args)]
pub struct DeliveryConfig {
    /// Twilio account SID
    #[arg(long, env = "TWILIO_ACCOUNT_SID")]
    pub account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Sender phone number
    #[arg(long, env = "TWILIO_FROM_PHONE", default_value = "+12057363740")]
    pub from_phone: String,

    /// Messages API base URL
    #[arg(long, env = "TWILIO_API_BASE", default_value = "https://api.twilio.com")]
    pub api_base: String,

    /// Upper bound on a single send request, in seconds
    #[arg(long, env = "TWILIO_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub timeout_seconds: u64,
}

impl fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "**redacted**"))
            .field("from_phone", &self.from_phone)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Tombstone settings.
#[derive(Debug, Args)]
pub struct TombstoneConfig {
    /// What restore does when several tombstones share a key
    #[arg(
        long = "tombstone-ambiguity-policy",
        env = "TOMBSTONE_AMBIGUITY_POLICY",
        value_enum,
        default_value_t = TombstoneAmbiguityPolicy::MostRecent
    )]
    pub ambiguity_policy: TombstoneAmbiguityPolicy,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn defaults_apply_when_only_database_is_given() -> testresult::TestResult {
        let harness = Harness::try_parse_from([
            "test",
            "--database-url",
            "postgres://localhost/reservations",
        ])?;

        let config = harness.config;

        assert_eq!(config.logging.log_format, LogFormat::Compact);
        assert_eq!(config.delivery.from_phone, "+12057363740");
        assert_eq!(config.delivery.timeout_seconds, 10);
        assert_eq!(
            config.tombstones.ambiguity_policy,
            TombstoneAmbiguityPolicy::MostRecent
        );

        Ok(())
    }

    #[test]
    fn ambiguity_policy_parses_kebab_case() -> testresult::TestResult {
        let harness = Harness::try_parse_from([
            "test",
            "--database-url",
            "postgres://localhost/reservations",
            "--tombstone-ambiguity-policy",
            "reject",
        ])?;

        assert_eq!(
            harness.config.tombstones.ambiguity_policy,
            TombstoneAmbiguityPolicy::Reject
        );

        Ok(())
    }

    #[test]
    fn delivery_debug_redacts_token() {
        let config = DeliveryConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("hunter2".to_string()),
            from_phone: "+15550000000".to_string(),
            api_base: "https://api.twilio.com".to_string(),
            timeout_seconds: 10,
        };

        let rendered = format!("{config:?}");

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("AC123"));
    }
}
