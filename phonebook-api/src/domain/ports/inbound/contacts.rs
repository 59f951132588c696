use async_trait::async_trait;

use crate::domain::{
    models::{AvatarUpload, Contact, ContactDetails, ContactId, ContactPage, ListParams},
    ContactError,
};

/// Inbound port for phonebook operations.
///
/// This trait defines the use cases that HTTP handlers can invoke.
/// It orchestrates the contact repository and avatar store to fulfill requests.
#[async_trait]
pub trait ContactService: Send + Sync + 'static {
    /// List contacts matching `search`, sorted and paginated.
    ///
    /// Missing parameters fall back to the configured listing defaults.
    async fn list_contacts(&self, params: ListParams) -> Result<ContactPage, ContactError>;

    async fn get_contact(&self, id: ContactId) -> Result<Contact, ContactError>;

    async fn create_contact(&self, details: ContactDetails) -> Result<Contact, ContactError>;

    async fn update_contact(
        &self,
        id: ContactId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError>;

    /// Replace the contact's avatar with `upload`.
    ///
    /// The new file is on disk before the record points at it, and the old
    /// file is only removed once the record no longer references it.
    async fn update_avatar(
        &self,
        id: ContactId,
        upload: Option<AvatarUpload>,
    ) -> Result<Contact, ContactError>;

    /// Delete the contact and its avatar file, returning the removed record.
    async fn delete_contact(&self, id: ContactId) -> Result<Contact, ContactError>;
}
