//! User request types for the simple `User` entity.
//!
//! These carry no reconciliation logic; they shape the payloads sent through
//! [`UserDirectory`](crate::gateway::UserDirectory).

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Default locale for newly created users.
pub const DEFAULT_LOCALE: &str = "ja_JP";

/// Default time zone for newly created users.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Default account status for newly created users.
pub const DEFAULT_STATUS: &str = "active";

/// Default page size for user listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A user to create.
///
/// ```rust
/// use sf_provisioning::users::NewUser;
///
/// let user = NewUser::new("NEW001", "newuser")
///     .with_first_name("New")
///     .with_last_name("User")
///     .with_email("new.user@example.com");
///
/// assert_eq!(user.display_name(), "New User");
/// assert_eq!(user.locale, "ja_JP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub locale: String,
    pub timezone: String,
    pub status: String,
}

impl NewUser {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            first_name: None,
            last_name: None,
            email: None,
            locale: DEFAULT_LOCALE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = non_blank(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = non_blank(last_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_blank(email.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// "first last", falling back to whichever name is present, then the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }

    /// Check required fields before anything is sent.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::missing_field("user_id"));
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::missing_field("username"));
        }
        Ok(())
    }

    /// JSON body for `POST User`.
    pub fn to_payload(&self) -> UserPayload<'_> {
        UserPayload {
            user_id: &self.user_id,
            username: &self.username,
            default_locale: &self.locale,
            time_zone: &self.timezone,
            status: &self.status,
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            email: self.email.as_deref(),
            display_name: self.display_name(),
        }
    }
}

/// Wire form of [`NewUser`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub default_locale: &'a str,
    pub time_zone: &'a str,
    pub status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub display_name: String,
}

/// Partial update of an existing user. Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "defaultLocale", skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = non_blank(value.into());
        self
    }

    pub fn with_last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = non_blank(value.into());
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = non_blank(value.into());
        self
    }

    pub fn with_locale(mut self, value: impl Into<String>) -> Self {
        self.locale = non_blank(value.into());
        self
    }

    pub fn with_timezone(mut self, value: impl Into<String>) -> Self {
        self.timezone = non_blank(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.locale.is_none()
            && self.timezone.is_none()
    }
}

/// Paging and filtering for user listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub top: u32,
    pub skip: u32,
    /// Raw OData `$filter` expression, passed through unchanged.
    pub filter: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            top: DEFAULT_PAGE_SIZE,
            skip: 0,
            filter: None,
        }
    }
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = non_blank(filter.into());
        self
    }
}

// Tool callers send "" for omitted optional strings.
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
