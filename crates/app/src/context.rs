//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    database::{self, Db},
    domain::{
        accounts::PgAccountDirectory,
        activity::{ActivityLog, PgActivityLog},
        catalog::{CatalogService, PgCatalogService},
        permissions::{PermissionsService, PgPermissionsService},
        reservations::{PgReservationsService, ReservationsService},
        tombstones::{PgTombstonesService, TombstonesService},
        two_factor::{
            OneTimeCodeService, PgOneTimeCodeService,
            delivery::{CodeDelivery, DeliveryCredentials, SmsGatewayClient},
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub activity: Arc<dyn ActivityLog>,
    pub catalog: Arc<dyn CatalogService>,
    pub permissions: Arc<dyn PermissionsService>,
    pub reservations: Arc<dyn ReservationsService>,
    pub tombstones: Arc<dyn TombstonesService>,
    pub two_factor: Arc<dyn OneTimeCodeService>,
}

impl AppContext {
    /// Connect to the database and wire every service.
    ///
    /// Missing delivery credentials do not fail startup; code issuance is
    /// disabled instead.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let delivery: Option<Arc<dyn CodeDelivery>> =
            match DeliveryCredentials::from_config(&config.delivery) {
                Ok(credentials) => match SmsGatewayClient::new(credentials) {
                    Ok(client) => Some(Arc::new(client)),
                    Err(error) => {
                        warn!(%error, "failed to build SMS gateway client; delivery is disabled");

                        None
                    }
                },
                Err(error) => {
                    warn!(%error, "one-time code delivery is disabled");

                    None
                }
            };

        info!(
            ambiguity_policy = ?config.tombstones.ambiguity_policy,
            delivery_enabled = delivery.is_some(),
            "application context ready"
        );

        Ok(Self {
            activity: Arc::new(PgActivityLog::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            permissions: Arc::new(PgPermissionsService::new(db.clone())),
            reservations: Arc::new(PgReservationsService::new(
                db.clone(),
                Arc::new(PgAccountDirectory::new(pool)),
            )),
            tombstones: Arc::new(PgTombstonesService::new(
                db.clone(),
                config.tombstones.ambiguity_policy,
            )),
            two_factor: Arc::new(PgOneTimeCodeService::new(db, delivery)),
        })
    }
}
