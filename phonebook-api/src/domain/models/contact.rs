use time::OffsetDateTime;

use super::ContactId;
use crate::domain::ContactError;

/// A persisted phonebook entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    /// File name inside the avatar store, if one was ever uploaded.
    pub avatar: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated name and phone, shared by create and update.
///
/// Can only be built through [`ContactDetails::new`], so holding one means
/// both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    name: String,
    phone: String,
}

impl ContactDetails {
    pub fn new(name: Option<&str>, phone: Option<&str>) -> Result<Self, ContactError> {
        let name = required("name", name)?;
        let phone = required("phone", phone)?;

        Ok(Self { name, phone })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

fn required(field: &str, value: Option<&str>) -> Result<String, ContactError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ContactError::validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_trim_surrounding_whitespace() {
        let details = ContactDetails::new(Some("  Alice "), Some(" 123")).unwrap();
        assert_eq!(details.name(), "Alice");
        assert_eq!(details.phone(), "123");
    }

    #[test]
    fn details_reject_missing_or_blank_fields() {
        for (name, phone, field) in [
            (None, Some("123"), "name"),
            (Some("   "), Some("123"), "name"),
            (Some("Alice"), None, "phone"),
            (Some("Alice"), Some(""), "phone"),
        ] {
            match ContactDetails::new(name, phone) {
                Err(ContactError::Validation(msg)) => assert_eq!(msg, format!("{field} is required")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }
}
