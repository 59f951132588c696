use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::domain::{
    models::{
        AvatarFileName, AvatarPolicy, AvatarUpload, Contact, ContactDetails, ContactId,
        ContactPage, ListParams, ListQuery, ListingDefaults,
    },
    ports::{
        inbound::ContactService,
        outbound::{AvatarInspector, AvatarStorage, ContactRepository},
    },
    ContactError,
};

/// Implementation of the ContactService inbound port.
///
/// Record changes go through the ContactRepository, image files through the
/// AvatarStorage. The AvatarInspector checks uploaded bytes against their
/// declared type before anything touches disk.
pub struct ContactServiceImpl<R, S, I> {
    repository: Arc<R>,
    avatars: Arc<S>,
    inspector: Arc<I>,
    listing: ListingDefaults,
    avatar_policy: AvatarPolicy,
}

impl<R, S, I> ContactServiceImpl<R, S, I> {
    pub fn new(repository: Arc<R>, avatars: Arc<S>, inspector: Arc<I>) -> Self {
        Self {
            repository,
            avatars,
            inspector,
            listing: ListingDefaults::default(),
            avatar_policy: AvatarPolicy::default(),
        }
    }

    pub fn with_listing_defaults(mut self, listing: ListingDefaults) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_avatar_policy(mut self, avatar_policy: AvatarPolicy) -> Self {
        self.avatar_policy = avatar_policy;
        self
    }
}

impl<R: ContactRepository, S: AvatarStorage, I: AvatarInspector> ContactServiceImpl<R, S, I> {
    async fn require(&self, id: ContactId) -> Result<Contact, ContactError> {
        self.repository
            .find_one(id)
            .await?
            .ok_or(ContactError::NotFound(id))
    }

    /// Best-effort removal of a file that never became authoritative.
    async fn discard(&self, file_name: &AvatarFileName) {
        if let Err(err) = self.avatars.remove(file_name.as_str()).await {
            tracing::warn!("failed to discard unused avatar {}: {}", file_name, err);
        }
    }
}

#[async_trait]
impl<R: ContactRepository, S: AvatarStorage, I: AvatarInspector> ContactService
    for ContactServiceImpl<R, S, I>
{
    async fn list_contacts(&self, params: ListParams) -> Result<ContactPage, ContactError> {
        let query = ListQuery::resolve(params, &self.listing)?;
        let (contacts, total) = self.repository.find(&query).await?;

        Ok(ContactPage::new(&query, contacts, total))
    }

    async fn get_contact(&self, id: ContactId) -> Result<Contact, ContactError> {
        self.require(id).await
    }

    #[instrument(skip(self))]
    async fn create_contact(&self, details: ContactDetails) -> Result<Contact, ContactError> {
        self.repository.insert(&details).await
    }

    #[instrument(skip(self))]
    async fn update_contact(
        &self,
        id: ContactId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError> {
        self.repository
            .update_details(id, &details)
            .await?
            .ok_or(ContactError::NotFound(id))
    }

    #[instrument(skip(self, upload))]
    async fn update_avatar(
        &self,
        id: ContactId,
        upload: Option<AvatarUpload>,
    ) -> Result<Contact, ContactError> {
        let upload = upload.ok_or(ContactError::MissingAvatar)?;

        let kind = self.avatar_policy.check_upload(&upload)?;
        if self.inspector.detect(&upload.bytes) != Some(kind) {
            return Err(ContactError::InvalidImage);
        }

        let existing = self.require(id).await?;

        let file_name = AvatarFileName::generate(&upload.file_name, kind);
        self.avatars.persist(&file_name, &upload.bytes).await?;

        let updated = match self.repository.update_avatar(id, &file_name).await {
            Ok(Some(contact)) => contact,
            Ok(None) => {
                self.discard(&file_name).await;
                return Err(ContactError::NotFound(id));
            }
            Err(err) => {
                self.discard(&file_name).await;
                return Err(err);
            }
        };

        // The record no longer references the old file, so a failure here can
        // only leave an orphan behind.
        if let Some(previous) = self.avatar_policy.owned_file(existing.avatar.as_deref()) {
            if previous != file_name.as_str() {
                if let Err(err) = self.avatars.remove(previous).await {
                    tracing::warn!("failed to remove previous avatar {}: {}", previous, err);
                }
            }
        }

        tracing::debug!("contact {} now uses avatar {}", id, file_name);
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_contact(&self, id: ContactId) -> Result<Contact, ContactError> {
        let existing = self.require(id).await?;

        if let Some(file_name) = self.avatar_policy.owned_file(existing.avatar.as_deref()) {
            self.avatars.remove(file_name).await?;
        }

        self.repository
            .delete(id)
            .await?
            .ok_or(ContactError::NotFound(id))
    }
}
