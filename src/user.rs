//! Identity component: registration, credential checks, group membership.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::credentials::CredentialHasher;
use crate::error::{EntityKind, QuestCoreError};
use crate::graph::{
    encode, EdgeFilter, EdgeType, GraphReader, GraphStore, Label, Node, StoreError,
};
use crate::group::Usergroup;

/// Passwords shorter than this are rejected at registration.
pub const MIN_PASSWORD_CHARS: usize = 5;

/// Unique identifier for a user. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new unique user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user with reward counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Globally unique, case-sensitive.
    pub username: String,
    /// Credential hash; the engine never sees plaintext after registration.
    pub password_hash: String,
    /// Level counter, starts at 1.
    pub level: i64,
    /// Experience counter.
    pub xp: i64,
    /// Gold counter.
    pub gold: i64,
    /// Counters for reward kinds beyond xp and gold, keyed by kind.
    #[serde(default)]
    pub counters: BTreeMap<String, i64>,
}

impl User {
    fn new(username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash,
            level: 1,
            xp: 0,
            gold: 0,
            counters: BTreeMap::new(),
        }
    }

    /// Add `amount` to the counter for a reward kind. `xp` and `gold` are
    /// first-class fields; any other kind lands in the generic counter map.
    pub fn grant(&mut self, kind: &str, amount: i64) {
        match kind {
            "xp" => self.xp += amount,
            "gold" => self.gold += amount,
            other => *self.counters.entry(other.to_string()).or_insert(0) += amount,
        }
    }

    /// Read the counter for a reward kind.
    pub fn counter(&self, kind: &str) -> i64 {
        match kind {
            "xp" => self.xp,
            "gold" => self.gold,
            other => self.counters.get(other).copied().unwrap_or(0),
        }
    }
}

/// Resolve a user entity to its graph node.
pub(crate) fn resolve_user<R: GraphReader + ?Sized>(
    reader: &R,
    user: &User,
) -> Result<Node, QuestCoreError> {
    reader
        .find_one(Label::User, "id", &json!(user.id))?
        .ok_or_else(|| QuestCoreError::NotFound {
            kind: EntityKind::User,
            name: user.username.clone(),
        })
}

/// The identity service. Talks only to the graph store and the credential
/// capability; group and quest services receive already-resolved entities.
pub struct Identity<S> {
    store: Arc<S>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<S: GraphStore> Identity<S> {
    /// Create the service over a store handle and a credential hasher.
    pub fn new(store: Arc<S>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Register a new user.
    ///
    /// Fails with [`QuestCoreError::AlreadyExists`] if the username is
    /// taken, and with [`QuestCoreError::InvalidInput`] if the username is
    /// empty or the password is shorter than [`MIN_PASSWORD_CHARS`].
    pub fn register(&self, username: &str, password: &str) -> Result<User, QuestCoreError> {
        if username.is_empty() {
            return Err(QuestCoreError::InvalidInput(
                "username must be at least one character".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(QuestCoreError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = User::new(username, password_hash);
        let properties = encode(&user)?;

        self.store
            .run_atomic(|txn| {
                if txn
                    .find_one(Label::User, "username", &json!(username))?
                    .is_some()
                {
                    return Err(QuestCoreError::AlreadyExists {
                        kind: EntityKind::User,
                        name: username.to_string(),
                    });
                }
                txn.create_node(Label::User, properties)?;
                Ok(())
            })
            .map_err(|e| match e {
                // The store-level constraint catches races the read misses.
                QuestCoreError::Store(StoreError::ConstraintViolation {
                    label: Label::User,
                    ..
                }) => QuestCoreError::AlreadyExists {
                    kind: EntityKind::User,
                    name: username.to_string(),
                },
                other => other,
            })?;

        tracing::info!(username, user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Exact-match lookup by username.
    pub fn lookup(&self, username: &str) -> Result<Option<User>, QuestCoreError> {
        match self
            .store
            .find_one(Label::User, "username", &json!(username))?
        {
            Some(node) => Ok(Some(node.decode()?)),
            None => Ok(None),
        }
    }

    /// Lookup by user ID.
    pub fn lookup_by_id(&self, id: UserId) -> Result<Option<User>, QuestCoreError> {
        match self.store.find_one(Label::User, "id", &json!(id))? {
            Some(node) => Ok(Some(node.decode()?)),
            None => Ok(None),
        }
    }

    /// Check a password. Returns `false` both for an unknown user and for a
    /// wrong password; callers cannot tell the two apart.
    pub fn verify_password(
        &self,
        username: &str,
        plaintext: &str,
    ) -> Result<bool, QuestCoreError> {
        Ok(self
            .lookup(username)?
            .map(|user| self.hasher.verify(plaintext, &user.password_hash))
            .unwrap_or(false))
    }

    /// Verify credentials and return the user. Fails with a single
    /// [`QuestCoreError::Unauthorized`] for every failure mode.
    pub fn login(&self, username: &str, plaintext: &str) -> Result<User, QuestCoreError> {
        let Some(user) = self.lookup(username)? else {
            return Err(QuestCoreError::Unauthorized);
        };
        if self.hasher.verify(plaintext, &user.password_hash) {
            tracing::debug!(username, "login succeeded");
            Ok(user)
        } else {
            Err(QuestCoreError::Unauthorized)
        }
    }

    /// Every group the user is a member of, in store enumeration order.
    pub fn groups_of(&self, user: &User) -> Result<Vec<Usergroup>, QuestCoreError> {
        let user_node = resolve_user(&*self.store, user)?;
        let memberships = self.store.match_edges(
            &EdgeFilter::new()
                .starting_at(user_node.id)
                .typed(EdgeType::In),
        )?;

        let mut groups = Vec::with_capacity(memberships.len());
        for edge in memberships {
            let group_node = self
                .store
                .node(edge.to)?
                .ok_or(StoreError::UnknownNode(edge.to))?;
            groups.push(group_node.decode()?);
        }
        Ok(groups)
    }
}
