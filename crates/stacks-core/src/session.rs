//! # Session Context
//!
//! Who is at the terminal. Created at login, dropped at logout or quit, and
//! passed explicitly to every menu action.

use crate::types::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nobody has logged in yet.
    #[default]
    Anonymous,
    SignedIn { email: String, role: Role },
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Session::SignedIn {
            email: user.email.clone(),
            role: user.role,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn { role, .. } => Some(*role),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn { email, .. } => Some(email),
        }
    }

    pub fn is_librarian(&self) -> bool {
        self.role() == Some(Role::Librarian)
    }
}
