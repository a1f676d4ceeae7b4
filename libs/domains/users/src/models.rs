use axum_helpers::FieldOrder;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{UserError, UserResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Ceiling for `page` and `limit`; Postgres LIMIT/OFFSET are bigint.
pub const MAX_QUERY_VALUE: u64 = i64::MAX as u64;

/// Payload fields in declaration order; the first failing one is reported.
const USER_FIELD_ORDER: &[&str] = &["name", "age", "email", "birth_date"];

/// Stored user as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = 36)]
    pub age: i32,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(value_type = String, format = Date, example = "1815-12-10")]
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    #[schema(example = "Ada Lovelace", max_length = 100)]
    pub name: String,

    /// Stored as 0 when omitted
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    #[schema(example = 36, minimum = 0, maximum = 150)]
    pub age: Option<i32>,

    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,

    /// Defaults to the current date when omitted
    #[schema(value_type = Option<String>, format = Date, example = "1815-12-10")]
    pub birth_date: Option<NaiveDate>,
}

impl FieldOrder for CreateUser {
    const FIELD_ORDER: &'static [&'static str] = USER_FIELD_ORDER;
}

/// Body of `PUT /users/{id}`; only the fields present are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    #[schema(max_length = 100)]
    pub name: Option<String>,

    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    #[schema(minimum = 0, maximum = 150)]
    pub age: Option<i32>,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<NaiveDate>,
}

impl FieldOrder for UpdateUser {
    const FIELD_ORDER: &'static [&'static str] = USER_FIELD_ORDER;
}

/// Listing predicate; unset fields are not applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Substring of the name
    pub name: Option<String>,
    /// Substring of the email
    pub email: Option<String>,
    pub age: Option<i32>,
    /// Inclusive lower bound on the birth date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the birth date
    pub end_date: Option<NaiveDate>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.name.as_ref().is_none_or(|n| user.name.contains(n.as_str()))
            && self.email.as_ref().is_none_or(|e| user.email.contains(e.as_str()))
            && self.age.is_none_or(|a| user.age == a)
            && self.start_date.is_none_or(|d| user.birth_date >= d)
            && self.end_date.is_none_or(|d| user.birth_date <= d)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub rows: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paged<T> {
    pub fn new(rows: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            rows,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Raw `GET /users` query string.
///
/// Kept as strings so malformed numbers fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, 1-based (default 1)
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size (default 10)
    #[param(example = "10")]
    pub limit: Option<String>,
    /// Name contains
    pub name: Option<String>,
    /// Email contains
    pub email: Option<String>,
    /// Exact age; ignored when not a number
    pub age: Option<String>,
    /// Earliest birth date, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Latest birth date, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

impl ListUsersQuery {
    /// Resolve `(page, limit, filter)`.
    ///
    /// # Errors
    /// `UserError::Validation` when a date bound is present but not a valid
    /// ISO date.
    pub fn into_parts(self) -> UserResult<(u64, u64, UserFilter)> {
        let page = positive_or(self.page.as_deref(), DEFAULT_PAGE);
        let limit = positive_or(self.limit.as_deref(), DEFAULT_LIMIT);

        let filter = UserFilter {
            name: non_empty(self.name),
            email: non_empty(self.email),
            age: self.age.as_deref().and_then(|a| a.trim().parse().ok()),
            start_date: parse_date("startDate", self.start_date)?,
            end_date: parse_date("endDate", self.end_date)?,
        };

        Ok((page, limit, filter))
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n.min(MAX_QUERY_VALUE))
        .unwrap_or(default)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.is_empty())
}

fn parse_date(field: &str, raw: Option<String>) -> UserResult<Option<NaiveDate>> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                UserError::Validation(format!(
                    "{} must be a valid date (YYYY-MM-DD), got '{}'",
                    field, value
                ))
            }),
    }
}

/// Payload of `GET /sys/be_type`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeType {
    #[schema(example = "rust")]
    pub be_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListUsersQuery {
        let object = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn test_defaults_when_absent() {
        let (page, limit, filter) = ListUsersQuery::default().into_parts().unwrap();
        assert_eq!((page, limit), (1, 10));
        assert_eq!(filter, UserFilter::default());
    }

    #[test]
    fn test_unparseable_or_zero_numbers_fall_back() {
        let (page, limit, _) = query(&[("page", "abc"), ("limit", "0")])
            .into_parts()
            .unwrap();
        assert_eq!((page, limit), (1, 10));

        let (page, limit, _) = query(&[("page", "3"), ("limit", "25")])
            .into_parts()
            .unwrap();
        assert_eq!((page, limit), (3, 25));
    }

    #[test]
    fn test_huge_numbers_are_clamped() {
        let (page, limit, _) = query(&[
            ("page", "18446744073709551615"),
            ("limit", "9223372036854775808"),
        ])
        .into_parts()
        .unwrap();
        assert_eq!((page, limit), (MAX_QUERY_VALUE, MAX_QUERY_VALUE));
    }

    #[test]
    fn test_unparseable_age_is_ignored() {
        let (_, _, filter) = query(&[("age", "old")]).into_parts().unwrap();
        assert_eq!(filter.age, None);

        let (_, _, filter) = query(&[("age", "30")]).into_parts().unwrap();
        assert_eq!(filter.age, Some(30));
    }

    #[test]
    fn test_dates_are_parsed_and_validated() {
        let (_, _, filter) = query(&[("startDate", "1990-01-01"), ("endDate", "1999-12-31")])
            .into_parts()
            .unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(1999, 12, 31));

        let err = query(&[("startDate", "yesterday")]).into_parts().unwrap_err();
        assert!(matches!(err, UserError::Validation(msg) if msg.contains("startDate")));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Paged<i32> = Paged::new(vec![], 21, 1, 10);
        assert_eq!(page.total_pages, 3);

        let empty: Paged<i32> = Paged::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUser {
            name: "Ada".to_string(),
            age: Some(36),
            email: "ada@example.com".to_string(),
            birth_date: None,
        };
        assert!(valid.validate().is_ok());

        let too_old = CreateUser {
            age: Some(151),
            ..valid.clone()
        };
        assert!(too_old.validate().is_err());

        let long_name = CreateUser {
            name: "x".repeat(101),
            ..valid.clone()
        };
        assert!(long_name.validate().is_err());

        let bad_email = CreateUser {
            email: "ada".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_name_is_reported_before_later_fields() {
        let invalid = CreateUser {
            name: String::new(),
            age: Some(200),
            email: "nope".to_string(),
            birth_date: None,
        };
        let errors = invalid.validate().unwrap_err();

        assert_eq!(
            axum_helpers::errors::first_violation(&errors, CreateUser::FIELD_ORDER),
            "name must be 1 to 100 characters"
        );

        let invalid = UpdateUser {
            age: Some(-1),
            email: Some("nope".to_string()),
            ..UpdateUser::default()
        };
        let errors = invalid.validate().unwrap_err();

        assert_eq!(
            axum_helpers::errors::first_violation(&errors, UpdateUser::FIELD_ORDER),
            "age must be between 0 and 150"
        );
    }

    #[test]
    fn test_create_user_json_is_camel_case_and_strict() {
        let parsed: CreateUser = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","birthDate":"1815-12-10"}"#,
        )
        .unwrap();
        assert_eq!(parsed.birth_date, NaiveDate::from_ymd_opt(1815, 12, 10));
        assert_eq!(parsed.age, None);

        assert!(serde_json::from_str::<CreateUser>(r#"{"name":"Ada"}"#).is_err());
        assert!(
            serde_json::from_str::<CreateUser>(
                r#"{"name":"Ada","email":"ada@example.com","id":5}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_update_user_allows_partial_bodies() {
        let parsed: UpdateUser = serde_json::from_str(r#"{"age":40}"#).unwrap();
        assert_eq!(parsed.age, Some(40));
        assert!(parsed.name.is_none());
        assert!(parsed.validate().is_ok());

        let invalid: UpdateUser = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(invalid.validate().is_err());
    }
}
