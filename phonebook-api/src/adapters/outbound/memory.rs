//! In-memory contact repository for tests.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{AvatarFileName, Contact, ContactDetails, ContactId, ListQuery, SortField, SortMode},
    ports::outbound::ContactRepository,
    ContactError,
};

#[derive(Default)]
struct State {
    rows: BTreeMap<ContactId, Contact>,
    last_id: i32,
}

/// Contact repository backed by a BTreeMap, mirroring the Postgres adapter's
/// filtering, ordering and paging rules.
///
/// Clones share the same rows, so a test can keep a handle for assertions
/// after moving one into the service.
#[derive(Clone, Default)]
pub struct InMemoryContactRepository {
    state: Arc<RwLock<State>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with a storage error.
    pub fn failing(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self.fail_writes();
        self
    }

    /// Mutations fail from now on; reads keep working.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Set the avatar column directly, bypassing the service.
    pub fn set_avatar(&self, id: ContactId, avatar: &str) {
        let mut state = self.state.write().unwrap();
        if let Some(contact) = state.rows.get_mut(&id) {
            contact.avatar = Some(avatar.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_read(&self) -> Result<(), ContactError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ContactError::storage("connection refused"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), ContactError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ContactError::storage("connection refused"));
        }
        Ok(())
    }

    fn modify(
        &self,
        id: ContactId,
        apply: impl FnOnce(&mut Contact),
    ) -> Result<Option<Contact>, ContactError> {
        self.check_write()?;
        let mut state = self.state.write().unwrap();

        Ok(state.rows.get_mut(&id).map(|contact| {
            apply(contact);
            contact.updated_at = OffsetDateTime::now_utc();
            contact.clone()
        }))
    }
}

fn compare(field: SortField, a: &Contact, b: &Contact) -> std::cmp::Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Phone => a.phone.cmp(&b.phone),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find(&self, query: &ListQuery) -> Result<(Vec<Contact>, i64), ContactError> {
        self.check_read()?;
        let state = self.state.read().unwrap();

        let mut matching: Vec<Contact> = state
            .rows
            .values()
            .filter(|contact| query.matches(contact))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare(query.sort_by, a, b);
            let ordering = match query.sort_mode {
                SortMode::Asc => ordering,
                SortMode::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_one(&self, id: ContactId) -> Result<Option<Contact>, ContactError> {
        self.check_read()?;
        Ok(self.state.read().unwrap().rows.get(&id).cloned())
    }

    async fn insert(&self, details: &ContactDetails) -> Result<Contact, ContactError> {
        self.check_write()?;
        let mut state = self.state.write().unwrap();

        state.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let contact = Contact {
            id: ContactId::new(state.last_id),
            name: details.name().to_string(),
            phone: details.phone().to_string(),
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(contact.id, contact.clone());

        Ok(contact)
    }

    async fn update_details(
        &self,
        id: ContactId,
        details: &ContactDetails,
    ) -> Result<Option<Contact>, ContactError> {
        self.modify(id, |contact| {
            contact.name = details.name().to_string();
            contact.phone = details.phone().to_string();
        })
    }

    async fn update_avatar(
        &self,
        id: ContactId,
        avatar: &AvatarFileName,
    ) -> Result<Option<Contact>, ContactError> {
        self.modify(id, |contact| contact.avatar = Some(avatar.to_string()))
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactError> {
        self.check_write()?;
        Ok(self.state.write().unwrap().rows.remove(&id))
    }
}
