//! HTTP response types for the phonebook endpoints.
//!
//! These types serialize to the JSON format expected by the frontend.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::models::{Contact, ContactPage};

/// A single contact.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    /// Avatar file name inside the images directory.
    pub avatar: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.as_i32(),
            name: contact.name,
            phone: contact.phone,
            avatar: contact.avatar,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Response for the list endpoint.
#[derive(Debug, Serialize)]
pub struct ContactPageResponse {
    pub phonebooks: Vec<ContactResponse>,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
    pub total: i64,
}

impl From<ContactPage> for ContactPageResponse {
    fn from(page: ContactPage) -> Self {
        Self {
            phonebooks: page.contacts.into_iter().map(ContactResponse::from).collect(),
            page: page.page,
            limit: page.limit,
            pages: page.pages,
            total: page.total,
        }
    }
}
