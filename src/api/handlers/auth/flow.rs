//! The account flow: register, login, logout, and the account view.
//!
//! Every operation takes its stores explicitly and returns a typed outcome;
//! the HTTP layer maps outcomes to status codes and messages. Nothing here
//! touches headers or cookies.

use tracing::{debug, error, warn};

use super::password::{self, VerifyOutcome};
use super::store::{
    AccountRecord, Activity, CredentialStore, GuestListStore, InsertOutcome, NewAccount,
    SessionData, SessionStore, Subscription,
};
use super::types::FieldError;
use super::validate;

/// Raw registration input as submitted by the client.
#[derive(Debug, Clone)]
pub struct RegisterFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Raw login input as submitted by the client.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// A freshly created session: the raw token for the cookie plus the data the
/// greeting needs.
#[derive(Debug)]
pub struct SessionInfo {
    pub token: String,
    pub data: SessionData,
}

#[derive(Debug)]
pub enum RegisterOutcome {
    Success(SessionInfo),
    DuplicateEmail,
    ValidationFailed(Vec<FieldError>),
    StoreError,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Success(SessionInfo),
    ValidationFailed(Vec<FieldError>),
    UnknownEmail,
    WrongPassword,
    StoreError,
}

/// What an authenticated account sees. The greeting comes from the session;
/// `account` is `None` when the record fetch degraded.
#[derive(Debug)]
pub struct AccountView {
    pub session: SessionData,
    pub account: Option<AccountRecord>,
    pub activities: Vec<Activity>,
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug)]
pub enum AccountViewOutcome {
    Authenticated(AccountView),
    Unauthenticated,
}

/// Register a new account and start a session for it.
///
/// Validation failures never touch the store. The unique constraint on email
/// is the authoritative duplicate check; the pre-lookup only short-circuits
/// the common case.
pub async fn register(
    accounts: &dyn CredentialStore,
    sessions: &dyn SessionStore,
    fields: RegisterFields,
) -> RegisterOutcome {
    let errors = validate::register_fields(&fields);
    if !errors.is_empty() {
        return RegisterOutcome::ValidationFailed(errors);
    }

    let email = validate::normalize_email(&fields.email);

    match accounts.find_by_email(&email).await {
        Ok(Some(_)) => return RegisterOutcome::DuplicateEmail,
        Ok(None) => {}
        Err(err) => {
            error!("Account lookup failed during registration: {err}");
            return RegisterOutcome::StoreError;
        }
    }

    let password_hash = match password::hash_password(&fields.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Password hashing failed: {err}");
            return RegisterOutcome::StoreError;
        }
    };

    let record = match accounts
        .insert(NewAccount {
            first_name: fields.first_name.trim().to_string(),
            last_name: fields.last_name.trim().to_string(),
            email,
            password_hash,
        })
        .await
    {
        Ok(InsertOutcome::Created(record)) => record,
        Ok(InsertOutcome::DuplicateEmail) => {
            // Lost a race with a concurrent registration for the same email.
            debug!("Insert hit the unique email constraint");
            return RegisterOutcome::DuplicateEmail;
        }
        Err(err) => {
            error!("Account insert failed: {err}");
            return RegisterOutcome::StoreError;
        }
    };

    let data = SessionData {
        account_id: record.id,
        first_name: record.first_name,
    };
    match sessions.set(data.clone()).await {
        Ok(token) => RegisterOutcome::Success(SessionInfo { token, data }),
        Err(err) => {
            error!("Session creation failed after registration: {err}");
            RegisterOutcome::StoreError
        }
    }
}

/// Authenticate credentials and start a session.
///
/// `current_token` is the caller's existing session, if any; it is cleared
/// when the verifier itself fails so a broken login attempt never leaves a
/// stale session behind.
pub async fn login(
    accounts: &dyn CredentialStore,
    sessions: &dyn SessionStore,
    current_token: Option<&str>,
    credentials: LoginCredentials,
) -> LoginOutcome {
    let errors = validate::login_fields(&credentials);
    if !errors.is_empty() {
        return LoginOutcome::ValidationFailed(errors);
    }

    let email = validate::normalize_email(&credentials.email);

    let record = match accounts.find_by_email(&email).await {
        Ok(Some(record)) => record,
        Ok(None) => return LoginOutcome::UnknownEmail,
        Err(err) => {
            // Lookup failures collapse into the unknown-email outcome so the
            // response leaks nothing about which emails exist.
            error!("Account lookup failed during login: {err}");
            return LoginOutcome::UnknownEmail;
        }
    };

    match password::verify_password(&credentials.password, &record.password_hash) {
        Ok(VerifyOutcome::Match) => {}
        Ok(VerifyOutcome::Mismatch) => return LoginOutcome::WrongPassword,
        Err(err) => {
            error!("Password verification failed: {err}");
            logout(sessions, current_token).await;
            return LoginOutcome::StoreError;
        }
    }

    let data = SessionData {
        account_id: record.id,
        first_name: record.first_name,
    };
    match sessions.set(data.clone()).await {
        Ok(token) => LoginOutcome::Success(SessionInfo { token, data }),
        Err(err) => {
            error!("Session creation failed after login: {err}");
            LoginOutcome::StoreError
        }
    }
}

/// Clear the caller's session. Idempotent; a missing or already-cleared
/// token is not an error.
pub async fn logout(sessions: &dyn SessionStore, token: Option<&str>) {
    let Some(token) = token else {
        return;
    };
    if let Err(err) = sessions.clear(token).await {
        warn!("Session clear failed: {err}");
    }
}

/// Build the account view for the holder of `token`.
///
/// Only session validity gates authentication. The account record and the
/// guest lists degrade independently: a failed fetch logs and yields an
/// absent account or an empty list, never an error page.
pub async fn load_account_view(
    accounts: &dyn CredentialStore,
    guest_lists: &dyn GuestListStore,
    sessions: &dyn SessionStore,
    token: Option<&str>,
) -> AccountViewOutcome {
    let Some(token) = token else {
        return AccountViewOutcome::Unauthenticated;
    };

    let session = match sessions.get(token).await {
        Ok(Some(session)) => session,
        Ok(None) => return AccountViewOutcome::Unauthenticated,
        Err(err) => {
            error!("Session lookup failed: {err}");
            return AccountViewOutcome::Unauthenticated;
        }
    };

    let account = match accounts.find_by_id(session.account_id).await {
        Ok(account) => account,
        Err(err) => {
            error!("Account fetch failed for the account view: {err}");
            None
        }
    };

    let activities = match guest_lists.list_activities().await {
        Ok(activities) => activities,
        Err(err) => {
            error!("Activity listing failed for the account view: {err}");
            Vec::new()
        }
    };

    let subscriptions = match guest_lists.list_subscriptions(session.account_id).await {
        Ok(subscriptions) => subscriptions,
        Err(err) => {
            error!("Subscription listing failed for the account view: {err}");
            Vec::new()
        }
    };

    AccountViewOutcome::Authenticated(AccountView {
        session,
        account,
        activities,
        subscriptions,
    })
}
