use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::domain::{
    models::{AvatarFileName, Contact, ContactDetails, ContactId, ListQuery, SortField},
    ports::outbound::ContactRepository,
    ContactError,
};

const CONTACT_COLUMNS: &str = "id, name, phone, avatar, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    phone: String,
    avatar: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            name: row.name,
            phone: row.phone,
            avatar: row.avatar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::Phone => "phone",
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
    }
}

/// `%term%` with LIKE metacharacters escaped, so the term is matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, pattern: &str) {
    builder
        .push(" WHERE name ILIKE ")
        .push_bind(pattern.to_string())
        .push(" OR phone ILIKE ")
        .push_bind(pattern.to_string());
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn find(&self, query: &ListQuery) -> Result<(Vec<Contact>, i64), ContactError> {
        let pattern = contains_pattern(&query.search);

        // Count and page read share a snapshot so total and rows agree.
        let mut tx = self.pool.begin().await.map_err(ContactError::storage)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(ContactError::storage)?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_filter(&mut count, &pattern);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(ContactError::storage)?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts"));
        push_filter(&mut select, &pattern);
        select
            .push(" ORDER BY ")
            .push(sort_column(query.sort_by))
            .push(" ")
            .push(query.sort_mode.as_str())
            .push(", id ASC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows: Vec<ContactRow> = select
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(ContactError::storage)?;

        tx.commit().await.map_err(ContactError::storage)?;

        Ok((rows.into_iter().map(Contact::from).collect(), total))
    }

    async fn find_one(&self, id: ContactId) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        Ok(row.map(Contact::from))
    }

    async fn insert(&self, details: &ContactDetails) -> Result<Contact, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            INSERT INTO contacts (name, phone, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(details.name())
        .bind(details.phone())
        .fetch_one(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        Ok(row.into())
    }

    async fn update_details(
        &self,
        id: ContactId,
        details: &ContactDetails,
    ) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            UPDATE contacts
            SET name = $2,
                phone = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(details.name())
        .bind(details.phone())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        Ok(row.map(Contact::from))
    }

    async fn update_avatar(
        &self,
        id: ContactId,
        avatar: &AvatarFileName,
    ) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            UPDATE contacts
            SET avatar = $2,
                updated_at = now()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(avatar.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        Ok(row.map(Contact::from))
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            DELETE FROM contacts
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        Ok(row.map(Contact::from))
    }
}
