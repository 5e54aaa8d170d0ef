//! Request/response types for the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::flow::AccountView;
use super::store::{AccountRecord, Activity, Subscription};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A single field-level validation message.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub account_id: Uuid,
    pub first_name: String,
}

/// Account details as exposed to the owner; the password hash never leaves
/// the store layer.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccountResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRecord> for AccountResponse {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            description: activity.description,
            starts_at: activity.starts_at,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub account_id: Uuid,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            activity_id: subscription.activity_id,
            account_id: subscription.account_id,
        }
    }
}

/// The authenticated account view. `account` is absent when the record fetch
/// degraded; the greeting fields always come from the session.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccountViewResponse {
    pub account_id: Uuid,
    pub first_name: String,
    pub account: Option<AccountResponse>,
    pub activities: Vec<ActivityResponse>,
    pub subscriptions: Vec<SubscriptionResponse>,
}

impl From<AccountView> for AccountViewResponse {
    fn from(view: AccountView) -> Self {
        Self {
            account_id: view.session.account_id,
            first_name: view.session.first_name,
            account: view.account.map(AccountResponse::from),
            activities: view.activities.into_iter().map(ActivityResponse::from).collect(),
            subscriptions: view
                .subscriptions
                .into_iter()
                .map(SubscriptionResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let request = RegisterRequest {
            first_name: "Alice".to_string(),
            last_name: "Vance".to_string(),
            email: "alice@example.com".to_string(),
            password: "CorrectHorse1".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.first_name, "Alice");
        Ok(())
    }

    #[test]
    fn field_error_round_trips() -> Result<()> {
        let error = FieldError {
            field: "email".to_string(),
            message: "Invalid email".to_string(),
        };
        let value = serde_json::to_value(&error)?;
        let decoded: FieldError = serde_json::from_value(value)?;
        assert_eq!(decoded, error);
        Ok(())
    }
}
