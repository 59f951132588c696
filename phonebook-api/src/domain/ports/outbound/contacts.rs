use async_trait::async_trait;

use crate::domain::{
    models::{AvatarFileName, Contact, ContactDetails, ContactId, ListQuery},
    ContactError,
};

/// Outbound port for contact persistence.
///
/// Every method is atomic on its own. Methods keyed by id return `None`
/// when no row matches instead of failing.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    /// Rows for the requested page plus the total number of matching rows.
    async fn find(&self, query: &ListQuery) -> Result<(Vec<Contact>, i64), ContactError>;

    async fn find_one(&self, id: ContactId) -> Result<Option<Contact>, ContactError>;

    async fn insert(&self, details: &ContactDetails) -> Result<Contact, ContactError>;

    async fn update_details(
        &self,
        id: ContactId,
        details: &ContactDetails,
    ) -> Result<Option<Contact>, ContactError>;

    async fn update_avatar(
        &self,
        id: ContactId,
        avatar: &AvatarFileName,
    ) -> Result<Option<Contact>, ContactError>;

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactError>;
}
