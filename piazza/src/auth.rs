use std::env;

/// Login credentials for a Piazza account.
///
/// The password is kept out of `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IntoCredentialsError {
    #[error("Missing PIAZZA_EMAIL")]
    MissingEmail,
    #[error("Missing PIAZZA_PASSWORD")]
    MissingPassword,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read credentials from `PIAZZA_EMAIL` and `PIAZZA_PASSWORD`.
    pub fn from_env() -> Result<Self, IntoCredentialsError> {
        let email = env::var("PIAZZA_EMAIL").map_err(|_| IntoCredentialsError::MissingEmail)?;
        let password =
            env::var("PIAZZA_PASSWORD").map_err(|_| IntoCredentialsError::MissingPassword)?;
        Ok(Self::new(email, password))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials::new("student@example.edu", "hunter2");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("student@example.edu"));
        assert!(!rendered.contains("hunter2"));
    }
}
