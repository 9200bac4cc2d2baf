//! Group component: registration, ownership, membership.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{EntityKind, QuestCoreError};
use crate::graph::{
    encode, EdgeFilter, EdgeType, GraphReader, GraphStore, Label, Node, NodeId, StoreError,
};
use crate::user::{resolve_user, User};

/// Unique identifier for a usergroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Create a new unique group ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A group of users. Ownership and membership live as edges, not fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usergroup {
    /// Unique identifier.
    pub id: GroupId,
    /// Globally unique group name.
    pub groupname: String,
}

impl Usergroup {
    fn new(groupname: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            groupname: groupname.into(),
        }
    }
}

/// Resolve a group entity to its graph node.
pub(crate) fn resolve_group<R: GraphReader + ?Sized>(
    reader: &R,
    group: &Usergroup,
) -> Result<Node, QuestCoreError> {
    reader
        .find_one(Label::Usergroup, "id", &json!(group.id))?
        .ok_or_else(|| QuestCoreError::NotFound {
            kind: EntityKind::Usergroup,
            name: group.groupname.clone(),
        })
}

/// The group service.
pub struct Groups<S> {
    store: Arc<S>,
}

impl<S: GraphStore> Groups<S> {
    /// Create the service over a store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a new group owned by `creator`.
    ///
    /// The group node and the creator's `owns` and `in` edges are written in
    /// one transaction; a group without an owner is never observable.
    pub fn register(
        &self,
        groupname: &str,
        creator: &User,
    ) -> Result<Usergroup, QuestCoreError> {
        if groupname.is_empty() {
            return Err(QuestCoreError::InvalidInput(
                "groupname must be at least one character".to_string(),
            ));
        }

        let group = Usergroup::new(groupname);
        let properties = encode(&group)?;

        self.store
            .run_atomic(|txn| {
                if txn
                    .find_one(Label::Usergroup, "groupname", &json!(groupname))?
                    .is_some()
                {
                    return Err(QuestCoreError::AlreadyExists {
                        kind: EntityKind::Usergroup,
                        name: groupname.to_string(),
                    });
                }
                let creator_node = resolve_user(&*txn, creator)?;
                let group_node = txn.create_node(Label::Usergroup, properties)?;
                txn.create_edge(creator_node.id, EdgeType::Owns, group_node.id)?;
                txn.create_edge(creator_node.id, EdgeType::In, group_node.id)?;
                Ok(())
            })
            .map_err(|e| match e {
                QuestCoreError::Store(StoreError::ConstraintViolation {
                    label: Label::Usergroup,
                    ..
                }) => QuestCoreError::AlreadyExists {
                    kind: EntityKind::Usergroup,
                    name: groupname.to_string(),
                },
                other => other,
            })?;

        tracing::info!(groupname, owner = %creator.username, "usergroup registered");
        Ok(group)
    }

    /// Add a user as a member. Idempotent: returns `false` with no store
    /// mutation if the membership edge already exists.
    pub fn add_member(&self, group: &Usergroup, user: &User) -> Result<bool, QuestCoreError> {
        self.store.run_atomic(|txn| -> Result<bool, QuestCoreError> {
            let group_node = resolve_group(&*txn, group)?;
            let user_node = resolve_user(&*txn, user)?;

            if has_edge(&*txn, user_node.id, EdgeType::In, group_node.id)? {
                return Ok(false);
            }
            txn.create_edge(user_node.id, EdgeType::In, group_node.id)?;
            Ok(true)
        })
    }

    /// Make a user an owner of the group, granting membership as well if
    /// they were not already a member.
    ///
    /// The `owns` edge is created unconditionally; re-applying this to an
    /// existing owner stacks a duplicate edge. That mirrors the behavior the
    /// rest of the system was built against.
    pub fn add_owner(
        &self,
        group: &Usergroup,
        user: &User,
    ) -> Result<Usergroup, QuestCoreError> {
        self.store.run_atomic(|txn| -> Result<(), QuestCoreError> {
            let group_node = resolve_group(&*txn, group)?;
            let user_node = resolve_user(&*txn, user)?;

            txn.create_edge(user_node.id, EdgeType::Owns, group_node.id)?;
            if !has_edge(&*txn, user_node.id, EdgeType::In, group_node.id)? {
                txn.create_edge(user_node.id, EdgeType::In, group_node.id)?;
            }
            Ok(())
        })?;

        tracing::info!(
            groupname = %group.groupname,
            owner = %user.username,
            "owner added"
        );
        Ok(group.clone())
    }

    /// Current owners, in store enumeration order.
    pub fn owners_of(&self, group: &Usergroup) -> Result<Vec<User>, QuestCoreError> {
        self.users_by_edge(group, EdgeType::Owns)
    }

    /// Current members, in store enumeration order.
    pub fn members_of(&self, group: &Usergroup) -> Result<Vec<User>, QuestCoreError> {
        self.users_by_edge(group, EdgeType::In)
    }

    /// Exact-match lookup by group name.
    pub fn lookup(&self, groupname: &str) -> Result<Option<Usergroup>, QuestCoreError> {
        match self
            .store
            .find_one(Label::Usergroup, "groupname", &json!(groupname))?
        {
            Some(node) => Ok(Some(node.decode()?)),
            None => Ok(None),
        }
    }

    /// Lookup by group ID.
    pub fn lookup_by_id(&self, id: GroupId) -> Result<Option<Usergroup>, QuestCoreError> {
        match self.store.find_one(Label::Usergroup, "id", &json!(id))? {
            Some(node) => Ok(Some(node.decode()?)),
            None => Ok(None),
        }
    }

    fn users_by_edge(
        &self,
        group: &Usergroup,
        edge_type: EdgeType,
    ) -> Result<Vec<User>, QuestCoreError> {
        let group_node = resolve_group(&*self.store, group)?;
        let edges = self
            .store
            .match_edges(&EdgeFilter::new().ending_at(group_node.id).typed(edge_type))?;

        let mut users = Vec::with_capacity(edges.len());
        for edge in edges {
            let user_node = self
                .store
                .node(edge.from)?
                .ok_or(StoreError::UnknownNode(edge.from))?;
            users.push(user_node.decode()?);
        }
        Ok(users)
    }
}

pub(crate) fn has_edge<R: GraphReader + ?Sized>(
    reader: &R,
    from: NodeId,
    edge_type: EdgeType,
    to: NodeId,
) -> Result<bool, QuestCoreError> {
    let edges = reader.match_edges(
        &EdgeFilter::new()
            .starting_at(from)
            .ending_at(to)
            .typed(edge_type),
    )?;
    Ok(!edges.is_empty())
}
