//! Composition root: wires concrete outbound adapters into the domain service.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    adapters::outbound::{
        filesystem::FilesystemAvatarStore, media::ImageFormatInspector,
        postgres::PostgresContactRepository,
    },
    config::Settings,
    domain::{
        ports::inbound::ContactService, services::ContactServiceImpl, ContactError,
    },
};

/// Build the Postgres + filesystem backed contact service.
///
/// Creates the images directory up front.
pub async fn contact_service(
    pool: PgPool,
    settings: &Settings,
) -> Result<Arc<dyn ContactService>, ContactError> {
    let avatar_store = FilesystemAvatarStore::new(settings.images.root.clone());
    avatar_store.ensure_root().await?;
    tracing::info!("storing avatars in {}", avatar_store.root().display());

    let service = ContactServiceImpl::new(
        Arc::new(PostgresContactRepository::new(pool)),
        Arc::new(avatar_store),
        Arc::new(ImageFormatInspector),
    )
    .with_listing_defaults(settings.listing.defaults())
    .with_avatar_policy(settings.images.policy());

    Ok(Arc::new(service))
}
