use std::{fmt, str::FromStr};

use serde::Deserialize;
use strum::EnumString;

use super::Contact;
use crate::domain::ContactError;

/// Column a contact listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum SortField {
    #[strum(ascii_case_insensitive, serialize = "id")]
    Id,
    #[strum(ascii_case_insensitive, serialize = "name")]
    Name,
    #[strum(ascii_case_insensitive, serialize = "phone")]
    Phone,
    #[strum(ascii_case_insensitive, serialize = "createdAt", serialize = "created_at")]
    CreatedAt,
    #[strum(ascii_case_insensitive, serialize = "updatedAt", serialize = "updated_at")]
    UpdatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
pub enum SortMode {
    #[default]
    #[strum(ascii_case_insensitive, serialize = "ASC")]
    Asc,
    #[strum(ascii_case_insensitive, serialize = "DESC")]
    Desc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback values for listing queries, loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingDefaults {
    pub limit: i64,
    pub max_limit: i64,
    pub sort_by: SortField,
    pub sort_mode: SortMode,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            limit: 5,
            max_limit: 100,
            sort_by: SortField::Id,
            sort_mode: SortMode::Asc,
        }
    }
}

/// Raw listing parameters as they arrive from the caller.
///
/// Every field is optional and still unparsed; [`ListQuery::resolve`] turns
/// them into a validated query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_mode: Option<String>,
}

/// A validated listing query: filter, ordering and the page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub sort_mode: SortMode,
    offset: i64,
}

impl ListQuery {
    pub fn resolve(params: ListParams, defaults: &ListingDefaults) -> Result<Self, ContactError> {
        let page = parse_positive("page", params.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive("limit", params.limit.as_deref())?.unwrap_or(defaults.limit);

        if limit > defaults.max_limit {
            return Err(ContactError::validation(format!(
                "limit must not exceed {}",
                defaults.max_limit
            )));
        }

        let sort_by = parse_choice("sortBy", params.sort_by.as_deref())?.unwrap_or(defaults.sort_by);
        let sort_mode =
            parse_choice("sortMode", params.sort_mode.as_deref())?.unwrap_or(defaults.sort_mode);

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ContactError::validation("page is out of range"))?;

        Ok(Self {
            search: params.search.unwrap_or_default().trim().to_string(),
            page,
            limit,
            sort_by,
            sort_mode,
            offset,
        })
    }

    /// Number of rows skipped before this page starts.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Case-insensitive substring match against name or phone.
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        contact.name.to_lowercase().contains(&needle)
            || contact.phone.to_lowercase().contains(&needle)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_positive(field: &str, value: Option<&str>) -> Result<Option<i64>, ContactError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    match value.parse::<i64>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(ContactError::validation(format!(
            "{field} must be a positive integer"
        ))),
    }
}

fn parse_choice<T: FromStr>(field: &str, value: Option<&str>) -> Result<Option<T>, ContactError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| ContactError::validation(format!("unsupported {field}: {value}")))
}

/// One page of a contact listing together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
    pub total: i64,
}

impl ContactPage {
    /// Pages past the last one come back empty; the metadata still describes
    /// the full result set.
    pub fn new(query: &ListQuery, contacts: Vec<Contact>, total: i64) -> Self {
        let total = total.max(0);
        let pages = (total + query.limit - 1) / query.limit;
        let contacts = if query.page > pages { Vec::new() } else { contacts };

        Self {
            contacts,
            page: query.page,
            limit: query.limit,
            pages,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::models::ContactId;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "search" => params.search = value,
                "page" => params.page = value,
                "limit" => params.limit = value,
                "sortBy" => params.sort_by = value,
                "sortMode" => params.sort_mode = value,
                other => panic!("unknown param {other}"),
            }
        }
        params
    }

    fn contact(name: &str, phone: &str) -> Contact {
        Contact {
            id: ContactId::new(1),
            name: name.to_string(),
            phone: phone.to_string(),
            avatar: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let query = ListQuery::resolve(ListParams::default(), &ListingDefaults::default()).unwrap();

        assert_eq!(query.search, "");
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 5);
        assert_eq!(query.sort_by, SortField::Id);
        assert_eq!(query.sort_mode, SortMode::Asc);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn resolve_uses_configured_defaults() {
        let defaults = ListingDefaults {
            limit: 20,
            max_limit: 50,
            sort_by: SortField::Name,
            sort_mode: SortMode::Desc,
        };
        let query = ListQuery::resolve(ListParams::default(), &defaults).unwrap();

        assert_eq!(query.limit, 20);
        assert_eq!(query.sort_by, SortField::Name);
        assert_eq!(query.sort_mode, SortMode::Desc);
    }

    #[test]
    fn resolve_parses_explicit_values() {
        let query = ListQuery::resolve(
            params(&[
                ("search", " ali "),
                ("page", "3"),
                ("limit", "10"),
                ("sortBy", "createdAt"),
                ("sortMode", "desc"),
            ]),
            &ListingDefaults::default(),
        )
        .unwrap();

        assert_eq!(query.search, "ali");
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_mode, SortMode::Desc);
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn resolve_treats_blank_values_as_missing() {
        let query = ListQuery::resolve(
            params(&[("page", ""), ("limit", " "), ("sortBy", "")]),
            &ListingDefaults::default(),
        )
        .unwrap();

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 5);
        assert_eq!(query.sort_by, SortField::Id);
    }

    #[test]
    fn resolve_rejects_invalid_values() {
        let defaults = ListingDefaults::default();
        for pairs in [
            vec![("page", "0")],
            vec![("page", "-2")],
            vec![("page", "two")],
            vec![("limit", "0")],
            vec![("limit", "101")],
            vec![("sortBy", "password")],
            vec![("sortMode", "sideways")],
            vec![("page", "9223372036854775807"), ("limit", "100")],
        ] {
            let result = ListQuery::resolve(params(&pairs), &defaults);
            assert!(
                matches!(result, Err(ContactError::Validation(_))),
                "{pairs:?} should be rejected"
            );
        }
    }

    #[test]
    fn matches_name_or_phone_case_insensitively() {
        let query = ListQuery::resolve(params(&[("search", "ALI")]), &ListingDefaults::default())
            .unwrap();
        assert!(query.matches(&contact("Alice", "555")));
        assert!(!query.matches(&contact("Bob", "555")));

        let query = ListQuery::resolve(params(&[("search", "12")]), &ListingDefaults::default())
            .unwrap();
        assert!(query.matches(&contact("Bob", "0812")));
    }

    #[test]
    fn page_metadata_rounds_pages_up() {
        let query = ListQuery::resolve(params(&[("limit", "5")]), &ListingDefaults::default())
            .unwrap();
        let page = ContactPage::new(&query, vec![contact("Alice", "1")], 11);

        assert_eq!(page.pages, 3);
        assert_eq!(page.total, 11);
        assert_eq!(page.contacts.len(), 1);
    }

    #[test]
    fn out_of_range_page_is_empty_with_metadata() {
        let query = ListQuery::resolve(
            params(&[("page", "4"), ("limit", "5")]),
            &ListingDefaults::default(),
        )
        .unwrap();
        let page = ContactPage::new(&query, vec![contact("Alice", "1")], 11);

        assert!(page.contacts.is_empty());
        assert_eq!(page.page, 4);
        assert_eq!(page.limit, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.total, 11);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let query = ListQuery::resolve(ListParams::default(), &ListingDefaults::default()).unwrap();
        let page = ContactPage::new(&query, Vec::new(), 0);

        assert_eq!(page.pages, 0);
        assert!(page.contacts.is_empty());
    }
}
