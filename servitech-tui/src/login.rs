use anyhow::{bail, Context, Result};
use servitech_client::ServitechClient;
use servitech_core::{
    adapters::outbound::authenticate,
    domain::{models::Session, IncidentSyncError},
};
use std::io::{self, Write};

use crate::session_store;

/// Run the interactive login flow:
/// 1. Ask for email, then for the password without echo
/// 2. POST the credentials to /usuarios/verificar
/// 3. Save the returned token and user to the session file
pub async fn run_login(client: &ServitechClient) -> Result<Session> {
    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin()
        .read_line(&mut email)
        .context("Failed to read email")?;
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let email = email.trim();
    validate_credentials(email, &password)?;

    let session = match authenticate(client, email, &password).await {
        Ok(session) => session,
        Err(IncidentSyncError::InvalidCredentials) => bail!("Invalid email or password."),
        Err(e) => {
            return Err(e).with_context(|| format!("Login against {} failed", client.base_url()))
        }
    };

    session_store::save_session(&session)?;
    tracing::info!(user_id = %session.user_id(), "Logged in");
    println!("Logged in as {}. Session saved.", session.user().name);

    Ok(session)
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() || password.is_empty() {
        bail!("Email and password are required.");
    }
    if !email.contains('@') {
        bail!("'{}' is not an email address.", email);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_fields() {
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("tecnico@servitech.es", "").is_err());
        assert!(validate_credentials("tecnico", "secret").is_err());
        assert!(validate_credentials("tecnico@servitech.es", "secret").is_ok());
    }
}
