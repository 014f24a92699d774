//! Infrastructure wiring: store selection, seeding, session service.

use std::sync::Arc;

use anyhow::Context;

use munadmin_auth::{Catalog, Hs256SessionTokens, RoutePolicy};
use munadmin_infra::bootstrap::{ensure_admin, ensure_seeded};
use munadmin_infra::records::{InMemoryRecordStore, RecordStore};
use munadmin_infra::{AccessService, AccessStore, AppConfig, InMemoryAccessStore, PostgresAccessStore};

pub struct AppServices {
    pub access: Arc<AccessService>,
    pub records: Arc<dyn RecordStore>,
    pub route_policy: RoutePolicy,
}

/// Build services from configuration and run the startup seeding.
///
/// `DATABASE_URL` selects Postgres; without it everything lives in memory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn AccessStore> = match &config.database_url {
        Some(url) => {
            let pg = PostgresAccessStore::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            pg.migrate().await.context("failed to apply schema")?;
            tracing::info!("using Postgres access store");
            Arc::new(pg)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory access store");
            Arc::new(InMemoryAccessStore::new())
        }
    };

    let hasher = config.hasher();

    ensure_seeded(store.as_ref(), &Catalog::standard())
        .await
        .context("failed to seed permission catalog")?;
    ensure_admin(store.as_ref(), hasher, &config.admin_login, &config.admin_password)
        .await
        .context("failed to bootstrap administrator")?;

    let access = AccessService::new(
        store,
        Arc::new(Hs256SessionTokens::new(config.jwt_secret.as_bytes())),
        hasher,
        config.session,
    );

    Ok(AppServices {
        access: Arc::new(access),
        records: Arc::new(InMemoryRecordStore::new()),
        route_policy: config.route_policy,
    })
}
