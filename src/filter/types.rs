use serde::Deserialize;

use crate::config::SearchConfig;
use crate::database::models::Contact;

use super::page::PageRequest;

/// Raw query string of `GET /api/contacts`. Everything arrives as text so a
/// malformed `page` or `size` falls back to its default instead of rejecting
/// the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl SearchParams {
    pub fn into_parts(self, config: &SearchConfig) -> (ContactFilter, PageRequest) {
        let page = PageRequest::from_params(self.page.as_deref(), self.size.as_deref(), config);
        let filter = ContactFilter {
            name: non_empty(self.name),
            email: non_empty(self.email),
            phone: non_empty(self.phone),
        };
        (filter, page)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Optional contact search criteria, ANDed together when several are present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactFilter {
    /// Predicate list for one user's contacts. Ownership always comes first,
    /// so no combination of filters can widen the result past that user.
    pub fn predicates(&self, user_id: i64) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::OwnedBy(user_id)];
        if let Some(name) = &self.name {
            predicates.push(Predicate::Contains {
                columns: &[ContactColumn::FirstName, ContactColumn::LastName],
                needle: name.clone(),
            });
        }
        if let Some(email) = &self.email {
            predicates.push(Predicate::Contains {
                columns: &[ContactColumn::Email],
                needle: email.clone(),
            });
        }
        if let Some(phone) = &self.phone {
            predicates.push(Predicate::Contains {
                columns: &[ContactColumn::Phone],
                needle: phone.clone(),
            });
        }
        predicates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactColumn {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl ContactColumn {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ContactColumn::FirstName => "first_name",
            ContactColumn::LastName => "last_name",
            ContactColumn::Email => "email",
            ContactColumn::Phone => "phone",
        }
    }

    pub fn value<'a>(&self, contact: &'a Contact) -> Option<&'a str> {
        match self {
            ContactColumn::FirstName => Some(contact.first_name.as_str()),
            ContactColumn::LastName => contact.last_name.as_deref(),
            ContactColumn::Email => contact.email.as_deref(),
            ContactColumn::Phone => contact.phone.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `contacts.user_id = owner`
    OwnedBy(i64),
    /// Case-insensitive substring match on any of the columns
    Contains {
        columns: &'static [ContactColumn],
        needle: String,
    },
}

impl Predicate {
    /// In-process evaluation, kept equivalent to the SQL from `FilterWhere`
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Predicate::OwnedBy(user_id) => contact.user_id == *user_id,
            Predicate::Contains { columns, needle } => {
                let needle = needle.to_lowercase();
                columns.iter().any(|column| {
                    column
                        .value(contact)
                        .map(|value| value.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            }
        }
    }
}

/// Bind parameter for generated SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
