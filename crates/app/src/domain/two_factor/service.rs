//! One-time code service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use mockall::automock;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        accounts::records::{AccountId, Principal},
        activity::PgActivityLogRepository,
        two_factor::{
            OneTimeCode,
            delivery::{CodeDelivery, ConfigurationError},
            errors::OneTimeCodeError,
            repository::PgOneTimeCodesRepository,
        },
    },
};

pub const CORRECT_CODE_ACTION: &str = "User entered correct two-factor auth code";
pub const INCORRECT_CODE_ACTION: &str = "User entered incorrect two-factor auth code";

#[must_use]
pub fn code_message(code: &OneTimeCode) -> String {
    format!("Your auth code: {code}")
}

#[derive(Clone)]
pub struct PgOneTimeCodeService {
    db: Db,
    delivery: Option<Arc<dyn CodeDelivery>>,
    rng: Arc<Mutex<StdRng>>,
    codes: PgOneTimeCodesRepository,
    activity: PgActivityLogRepository,
}

impl PgOneTimeCodeService {
    /// Without a delivery channel every issuance fails as misconfigured.
    #[must_use]
    pub fn new(db: Db, delivery: Option<Arc<dyn CodeDelivery>>) -> Self {
        Self {
            db,
            delivery,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            codes: PgOneTimeCodesRepository::new(),
            activity: PgActivityLogRepository::new(),
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    fn generate_code(&self) -> OneTimeCode {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        OneTimeCode::generate(&mut *rng)
    }
}

impl Debug for PgOneTimeCodeService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgOneTimeCodeService")
            .field("db", &self.db)
            .field("delivery_configured", &self.delivery.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OneTimeCodeService for PgOneTimeCodeService {
    #[tracing::instrument(
        name = "two_factor.service.issue",
        skip(self, target),
        fields(account_id = %account),
        err
    )]
    async fn issue(&self, account: AccountId, target: &str) -> Result<(), OneTimeCodeError> {
        let delivery = self
            .delivery
            .as_ref()
            .ok_or(ConfigurationError::DeliveryUnavailable)?;

        let code = self.generate_code();

        let mut tx = self.db.begin_transaction().await?;

        let record = self.codes.create_code(&mut tx, account, &code).await?;

        // Send before commit so a failed delivery leaves no code behind.
        delivery.send(target, &code_message(&code)).await?;

        tx.commit().await?;

        info!(code_id = %record.id, "issued one-time code");

        Ok(())
    }

    #[tracing::instrument(
        name = "two_factor.service.validate",
        skip(self, submitted),
        fields(principal = %principal),
        err
    )]
    async fn validate(
        &self,
        principal: Principal,
        submitted: &str,
    ) -> Result<bool, OneTimeCodeError> {
        let Some(account) = principal.account() else {
            debug!("anonymous principal cannot hold codes");

            return Ok(false);
        };

        let mut tx = self.db.begin_transaction().await?;

        let latest = self.codes.latest_code(&mut tx, account).await?;

        let matched = match latest {
            Some(record) if record.code.matches(submitted) => {
                self.codes.delete_code(&mut tx, record.id).await?;

                true
            }
            Some(_) | None => false,
        };

        let action = if matched {
            CORRECT_CODE_ACTION
        } else {
            INCORRECT_CODE_ACTION
        };

        self.activity.append(&mut tx, Some(account), action).await?;

        tx.commit().await?;

        debug!(matched, "validated one-time code");

        Ok(matched)
    }
}

#[automock]
#[async_trait]
pub trait OneTimeCodeService: Send + Sync {
    /// Generates, stores and delivers a fresh code for the account.
    async fn issue(&self, account: AccountId, target: &str) -> Result<(), OneTimeCodeError>;

    /// Checks a submission against the account's most recent code.
    ///
    /// Only a matching code is consumed. Older codes are never compared.
    async fn validate(
        &self,
        principal: Principal,
        submitted: &str,
    ) -> Result<bool, OneTimeCodeError>;
}
