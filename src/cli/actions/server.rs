use crate::api;
use anyhow::{Context, Result};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_url: String,
    pub session_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the DSN is malformed or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // Fail early on an unparseable DSN instead of at pool creation.
    let dsn = Url::parse(&args.dsn).context("invalid database DSN")?;

    let auth_config = api::handlers::auth::AuthConfig::new(args.frontend_url)
        .with_session_ttl_seconds(args.session_ttl_seconds);

    api::new(args.port, dsn.to_string(), auth_config).await
}
