use thiserror::Error;
use tracing::debug;

use crate::{
    models::user::User,
    session::{AuthError, IdentityProvider, SessionHolder},
};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl RegisterError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingEmail => "auth/missing-email",
            Self::MissingPassword => "auth/missing-password",
            Self::Auth(e) => e.code(),
        }
    }
}

pub struct RegisterParameters {
    pub email: String,
    pub password: String,
}

/// Creates the account and signs it in. Subscribers of `session` are told.
pub fn register<P: IdentityProvider>(
    session: &mut SessionHolder<'_, P>,
    parameters: RegisterParameters,
) -> Result<User, RegisterError> {
    let email = parameters.email.trim();
    if email.is_empty() {
        return Err(RegisterError::MissingEmail);
    }
    if parameters.password.is_empty() {
        return Err(RegisterError::MissingPassword);
    }

    Ok(session.register(email, &parameters.password)?)
}

#[derive(Debug, Error)]
pub enum LogInError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl LogInError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingEmail => "auth/missing-email",
            Self::MissingPassword => "auth/missing-password",
            Self::Auth(e) => e.code(),
        }
    }
}

pub struct LogInParameters {
    pub email: String,
    pub password: String,
}

pub fn log_in<P: IdentityProvider>(
    session: &mut SessionHolder<'_, P>,
    parameters: LogInParameters,
) -> Result<User, LogInError> {
    let email = parameters.email.trim();
    if email.is_empty() {
        return Err(LogInError::MissingEmail);
    }
    if parameters.password.is_empty() {
        return Err(LogInError::MissingPassword);
    }

    Ok(session.sign_in(email, &parameters.password)?)
}

#[derive(Debug, Error)]
pub enum LogOutError {
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl LogOutError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(e) => e.code(),
        }
    }
}

/// Returns false when nobody was signed in; nothing is written then.
pub fn log_out<P: IdentityProvider>(session: &mut SessionHolder<'_, P>) -> Result<bool, LogOutError> {
    let was_signed_in = session.current_user().is_some();
    session.sign_out()?;
    debug!(was_signed_in, "log out handled");
    Ok(was_signed_in)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::LocalIdentityProvider, storage::memory::MemoryStorage};

    fn register_params(email: &str, password: &str) -> RegisterParameters {
        RegisterParameters {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn log_in_params(email: &str, password: &str) -> LogInParameters {
        LogInParameters {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_rejects_missing_fields_without_writing() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let err = register(&mut session, register_params("  ", "hunter22")).unwrap_err();
        assert_eq!(err.code(), "auth/missing-email");

        let err = register(&mut session, register_params("ana@example.com", "")).unwrap_err();
        assert_eq!(err.code(), "auth/missing-password");

        assert_eq!(storage.save_count(), 0);
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_register_passes_provider_errors_through() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let err = register(&mut session, register_params("ana@example.com", "123")).unwrap_err();

        assert!(matches!(err, RegisterError::Auth(AuthError::WeakPassword)));
        assert_eq!(err.code(), "auth/weak-password");
    }

    #[test]
    fn test_register_then_log_out_then_log_in() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let registered =
            register(&mut session, register_params(" ana@example.com ", "hunter22")).unwrap();
        assert_eq!(registered.email, "ana@example.com");
        assert_eq!(session.current_user(), Some(&registered));

        assert!(log_out(&mut session).unwrap());
        assert!(session.current_user().is_none());

        let logged_in = log_in(&mut session, log_in_params("ana@example.com", "hunter22")).unwrap();
        assert_eq!(logged_in, registered);
    }

    #[test]
    fn test_log_in_errors() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let err = log_in(&mut session, log_in_params("", "hunter22")).unwrap_err();
        assert_eq!(err.code(), "auth/missing-email");

        let err = log_in(&mut session, log_in_params("ana@example.com", "")).unwrap_err();
        assert_eq!(err.code(), "auth/missing-password");

        let err = log_in(&mut session, log_in_params("ana@example.com", "hunter22")).unwrap_err();
        assert_eq!(err.code(), "auth/user-not-found");
    }

    #[test]
    fn test_log_out_when_signed_out_reports_false() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        assert!(!log_out(&mut session).unwrap());
        assert_eq!(storage.save_count(), 0);
    }
}
