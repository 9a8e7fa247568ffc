//! # Accounts
//!
//! Signup and login against `library_users`.
//!
//! ## Login Flow
//! ```text
//! authenticate(email, credential)
//!      │
//!      ├── no such email        ─┐
//!      ├── hash does not verify ─┴─► AuthenticationFailed (same error)
//!      ▼
//!   User { role } ──► Session::for_user
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::credentials::{hash_credential, verify_credential};
use crate::error::ServiceResult;
use crate::repository::UserRepository;
use stacks_core::validation::validate_signup;
use stacks_core::{CoreError, NewUser, Role, SignupForm, User, ValidationError};

#[derive(Debug, Clone)]
pub struct AccountService {
    users: UserRepository,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        AccountService {
            users: UserRepository::new(pool),
        }
    }

    /// Registers a patron from a console signup form.
    ///
    /// Signup always creates a patron; librarians come from the seed tool.
    pub async fn sign_up(&self, form: &SignupForm) -> ServiceResult<User> {
        let new_user = validate_signup(form)?;
        self.register(&new_user, Role::Patron).await
    }

    /// Registers a validated user with an explicit role.
    ///
    /// ## Errors
    /// - `Validation(Duplicate)` if the email is already registered
    pub async fn register(&self, user: &NewUser, role: Role) -> ServiceResult<User> {
        debug!(email = %user.email, role = role.label(), "Registering user");

        if self.users.exists(&user.email).await? {
            warn!(email = %user.email, "Signup with an existing email");
            return Err(duplicate_email(&user.email).into());
        }

        let hash = hash_credential(&user.credential)?;

        let created = match self.users.insert(user, role, &hash).await {
            Ok(created) => created,
            Err(err) if err.is_unique_violation() => {
                return Err(duplicate_email(&user.email).into());
            }
            Err(err) => return Err(err.into()),
        };

        info!(email = %created.email, role = created.role.label(), "User registered");
        Ok(created)
    }

    /// Verifies a login. Unknown email and wrong credential fail identically.
    pub async fn authenticate(&self, email: &str, credential: &str) -> ServiceResult<User> {
        let email = email.trim();
        debug!(email = %email, "Authenticating");

        let verified = match self.users.credential_hash(email).await? {
            Some(hash) => verify_credential(credential, &hash),
            None => false,
        };

        if !verified {
            warn!(email = %email, "Authentication failed");
            return Err(CoreError::AuthenticationFailed.into());
        }

        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(CoreError::AuthenticationFailed)?;

        info!(email = %user.email, role = user.role.label(), "User logged in");
        Ok(user)
    }
}

fn duplicate_email(email: &str) -> CoreError {
    ValidationError::Duplicate {
        field: "email".to_string(),
        value: email.to_string(),
    }
    .into()
}
