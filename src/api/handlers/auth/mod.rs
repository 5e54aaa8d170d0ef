//! Account and session handlers plus the flow behind them.
//!
//! The flow layer owns the semantics (typed outcomes, explicit stores); the
//! handlers only translate HTTP in and out. Session tokens are random values
//! stored hashed, carried in an `HttpOnly` cookie or a bearer header.

pub(crate) mod account;
pub(crate) mod flow;
pub(crate) mod login;
mod password;
pub(crate) mod register;
pub(crate) mod session;
mod state;
mod store;
pub(crate) mod types;
mod validate;

pub use state::{AuthConfig, AuthState};
pub use store::PgStore;
