//! Session management on top of durable key/value slots
//!
//! The session is three independent string slots (token, role, user id).
//! They are always written and cleared together, and a missing token means
//! "logged out" whatever the other two slots still hold.

use common::{KeyValueStore, MemoryStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

/// Slot holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Slot holding the role name
pub const ROLE_KEY: &str = "user_role";
/// Slot holding the user id
pub const USER_ID_KEY: &str = "user_id";

const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, USER_ID_KEY];

/// Role carried by an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Staff,
    Admin,
}

impl Role {
    /// Get the stored form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Staff => "STAFF",
            Role::Admin => "ADMIN",
        }
    }

    /// Pick the most privileged role from backend role names.
    ///
    /// Unknown names are ignored and an empty list yields [`Role::User`].
    pub fn highest<S: AsRef<str>>(roles: &[S]) -> Role {
        roles
            .iter()
            .filter_map(|r| r.as_ref().parse::<Role>().ok())
            .max()
            .unwrap_or(Role::User)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts both `ADMIN` and the backend's `ROLE_ADMIN` form, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "USER" => Ok(Role::User),
            "STAFF" => Ok(Role::Staff),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Snapshot of the persisted session slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<String>,
}

/// Session lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated {
        role: Option<Role>,
        user_id: Option<String>,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Collapse the slots into a lifecycle state. Role and user id are
    /// dropped when there is no token.
    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated {
                role: self.role,
                user_id: self.user_id.clone(),
            }
        } else {
            SessionState::Anonymous
        }
    }

    /// Role of an authenticated session
    pub fn active_role(&self) -> Option<Role> {
        self.token.as_ref().and(self.role)
    }

    /// User id of an authenticated session
    pub fn active_user_id(&self) -> Option<&str> {
        self.token.as_ref().and(self.user_id.as_deref())
    }

    pub fn is_admin(&self) -> bool {
        self.active_role() == Some(Role::Admin)
    }

    /// Staff pages are open to admins as well
    pub fn is_staff(&self) -> bool {
        matches!(self.active_role(), Some(Role::Staff | Role::Admin))
    }

    pub fn is_customer(&self) -> bool {
        self.active_role() == Some(Role::User)
    }
}

/// Session manager for reading and mutating the persisted session
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a new session manager over the given slot store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Create a session manager that forgets everything on exit
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read the three session slots in one pass
    pub fn get_session(&self) -> StorageResult<Session> {
        let mut slots = self.store.get_many(&SESSION_KEYS)?.into_iter();
        let token = slots.next().flatten();
        let role = slots.next().flatten().and_then(|r| r.parse().ok());
        let user_id = slots.next().flatten();

        Ok(Session {
            token,
            role,
            user_id,
        })
    }

    /// Persist a new session. All three slots become visible together.
    pub fn set_session(&self, token: &str, role: Role, user_id: &str) -> StorageResult<()> {
        info!("Creating session for user: {} ({})", user_id, role);

        self.store.set_many(&[
            (TOKEN_KEY, token),
            (ROLE_KEY, role.as_str()),
            (USER_ID_KEY, user_id),
        ])
    }

    /// Remove all session slots. Safe to call repeatedly.
    pub fn clear_session(&self) -> StorageResult<()> {
        info!("Clearing session");
        self.store.remove_many(&SESSION_KEYS)
    }

    /// Whether a token is currently stored. Storage failures read as
    /// logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.is_some(),
            Err(e) => {
                error!("Failed to read session token: {}", e);
                false
            }
        }
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read session token: {}", e);
                None
            }
        }
    }
}
