//! Who is signed in, and who wants to know when that changes.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    models::user::{User, UserAccount},
    storage::{Storage, StorageError},
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("An account already exists for '{0}'")]
    EmailAlreadyInUse(String),

    #[error("No account found for '{0}'")]
    UserNotFound(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable error code, in the `auth/...` form used by hosted providers
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "auth/invalid-email",
            Self::WeakPassword => "auth/weak-password",
            Self::EmailAlreadyInUse(_) => "auth/email-already-in-use",
            Self::UserNotFound(_) => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::Storage(_) => "auth/internal-error",
        }
    }
}

pub trait IdentityProvider {
    /// The identity persisted from an earlier sign-in, if any
    fn restore(&self) -> Result<Option<User>, AuthError>;
    fn create_user(&self, email: &str, password: &str) -> Result<User, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;
    fn sign_out(&self) -> Result<(), AuthError>;
}

/// Accounts and the current session kept in the local store file.
pub struct LocalIdentityProvider<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> LocalIdentityProvider<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

impl<S: Storage> IdentityProvider for LocalIdentityProvider<'_, S> {
    fn restore(&self) -> Result<Option<User>, AuthError> {
        let store = self.storage.load()?;
        Ok(store
            .session
            .as_deref()
            .and_then(|uid| store.get_account(uid))
            .map(UserAccount::user))
    }

    fn create_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        self.storage.update(|store| {
            if store.get_account_by_email(email).is_some() {
                return Err(AuthError::EmailAlreadyInUse(email.to_string()));
            }

            let salt = Uuid::new_v4().simple().to_string();
            let account = UserAccount {
                uid: Uuid::new_v4().to_string(),
                email: email.to_string(),
                password_hash: hash_password(&salt, password),
                salt,
                created_at: jiff::Timestamp::now(),
            };
            let user = account.user();

            store.add_account(account);
            store.session = Some(user.uid.clone());
            Ok(user)
        })
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        self.storage.update(|store| {
            let account = store
                .get_account_by_email(email)
                .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

            if hash_password(&account.salt, password) != account.password_hash {
                return Err(AuthError::WrongPassword);
            }

            let user = account.user();
            store.session = Some(user.uid.clone());
            Ok(user)
        })
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        if self.storage.load()?.session.is_none() {
            return Ok(());
        }
        self.storage.update(|store| {
            store.session = None;
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener<'l> = Box<dyn FnMut(Option<&User>) + 'l>;

/// Holds the current identity and notifies subscribers when it changes.
///
/// Passed down explicitly to whatever needs the user; there is no global.
pub struct SessionHolder<'l, P: IdentityProvider> {
    provider: P,
    current: Option<User>,
    listeners: Vec<(SubscriptionId, Listener<'l>)>,
    next_id: u64,
}

impl<'l, P: IdentityProvider> SessionHolder<'l, P> {
    pub fn new(provider: P) -> Result<Self, AuthError> {
        let current = provider.restore()?;
        debug!(signed_in = current.is_some(), "session restored");
        Ok(Self {
            provider,
            current,
            listeners: Vec::new(),
            next_id: 0,
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Registers `listener`. It is called once right away with the current
    /// identity, then again on every sign-in and sign-out.
    pub fn subscribe(&mut self, mut listener: impl FnMut(Option<&User>) + 'l) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        listener(self.current.as_ref());
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn register(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.provider.create_user(email, password)?;
        info!(uid = %user.uid, email = %user.email, "user registered");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.provider.sign_in(email, password)?;
        info!(uid = %user.uid, email = %user.email, "user signed in");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.provider.sign_out()?;
        if self.current.is_some() {
            info!("user signed out");
        }
        self.set_current(None);
        Ok(())
    }

    fn set_current(&mut self, user: Option<User>) {
        if self.current == user {
            return;
        }
        self.current = user;
        for (_, listener) in self.listeners.iter_mut() {
            listener(self.current.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_register_signs_in_and_persists_session() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let user = session.register("ana@example.com", "hunter22").unwrap();

        assert_eq!(session.current_user(), Some(&user));
        let restored = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();
        assert_eq!(restored.current_user(), Some(&user));
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();
        session.register("ana@example.com", "hunter22").unwrap();

        let account = &storage.snapshot().accounts[0];
        assert_ne!(account.password_hash, "hunter22");
        assert_eq!(account.password_hash.len(), 64);
    }

    #[test]
    fn test_register_validation_errors() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let err = session.register("not-an-email", "hunter22").unwrap_err();
        assert_eq!(err.code(), "auth/invalid-email");

        let err = session.register("ana@example.com", "123").unwrap_err();
        assert_eq!(err.code(), "auth/weak-password");

        session.register("ana@example.com", "hunter22").unwrap();
        let err = session.register("ANA@example.com", "hunter22").unwrap_err();
        assert_eq!(err.code(), "auth/email-already-in-use");
    }

    #[test]
    fn test_sign_in_errors() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();
        session.register("ana@example.com", "hunter22").unwrap();
        session.sign_out().unwrap();

        let err = session.sign_in("bo@example.com", "hunter22").unwrap_err();
        assert_eq!(err.code(), "auth/user-not-found");

        let err = session.sign_in("ana@example.com", "wrong-password").unwrap_err();
        assert_eq!(err.code(), "auth/wrong-password");
        assert!(session.current_user().is_none());

        let user = session.sign_in("ana@example.com", "hunter22").unwrap();
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_subscribers_see_every_change_until_unsubscribed() {
        let storage = MemoryStorage::new();
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let sink = Rc::clone(&seen);
        let id = session.subscribe(move |user| {
            sink.borrow_mut().push(user.map(|u| u.email.clone()));
        });
        session.register("ana@example.com", "hunter22").unwrap();
        session.sign_out().unwrap();
        assert!(session.unsubscribe(id));
        session.sign_in("ana@example.com", "hunter22").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![None, Some(String::from("ana@example.com")), None]
        );
        assert!(!session.unsubscribe(id));
    }

    #[test]
    fn test_sign_out_when_signed_out_does_not_notify() {
        let storage = MemoryStorage::new();
        let calls = Rc::new(RefCell::new(0));
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();

        let counter = Rc::clone(&calls);
        session.subscribe(move |_| *counter.borrow_mut() += 1);
        session.sign_out().unwrap();

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_rejected_register_and_sign_in_write_nothing() {
        let storage = MemoryStorage::new();
        let mut session = SessionHolder::new(LocalIdentityProvider::new(&storage)).unwrap();
        session.register("ana@example.com", "hunter22").unwrap();
        session.sign_out().unwrap();
        let saves = storage.save_count();

        assert!(session.register("ana@example.com", "hunter22").is_err());
        assert!(session.sign_in("ana@example.com", "wrong-password").is_err());

        assert_eq!(storage.save_count(), saves);
        assert_eq!(storage.snapshot().accounts.len(), 1);
        assert!(storage.snapshot().session.is_none());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
    }
}
