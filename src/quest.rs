//! Quest component: creation, eligibility, and the completion lifecycle.
//!
//! A quest moves through a small state machine:
//!
//! ```text
//!             complete                approve
//!   Open ───────────────▶ PendingApproval ───────▶ Approved (terminal,
//!    ▲                          │                            paid out once)
//!    └──────────────────────────┘
//!              deny
//! ```
//!
//! Payout happens inside the approve transition and nowhere else, so a quest
//! can never pay twice: a second approve is rejected as an invalid
//! transition before any counter is touched.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{EntityKind, QuestCoreError};
use crate::graph::{
    encode, EdgeFilter, EdgeType, GraphReader, GraphStore, GraphWriter, Label, Node, NodeId,
    StoreError,
};
use crate::group::{has_edge, resolve_group, Usergroup};
use crate::reward::{RewardLine, VirtualReward};
use crate::user::{resolve_user, User, UserId};

/// Unique identifier for a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(Uuid);

impl QuestId {
    /// Create a new unique quest ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a quest is in its lifecycle, derived from the stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    /// Claimable by any eligible user.
    Open,
    /// Completed and awaiting an owner's approve or deny.
    PendingApproval,
    /// Approved and paid out. Terminal.
    Approved,
    /// Inactive with no completer on record. The engine never produces this
    /// itself; an externally closed quest reads back as this.
    Closed,
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestStatus::Open => "open",
            QuestStatus::PendingApproval => "pending approval",
            QuestStatus::Approved => "approved",
            QuestStatus::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A quest posted under a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique identifier.
    pub id: QuestId,
    /// Quest name, unique among the group's *active* quests.
    pub questname: String,
    /// Creation time, unix seconds.
    pub created: i64,
    /// Whether the quest is claimable.
    pub active: bool,
    /// Whether the quest has been approved and paid out.
    pub approved: bool,
    /// Who completed the quest, while approval is pending or granted.
    pub completed_by: Option<UserId>,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Optional human-readable non-virtual reward ("a warm meal").
    pub reward: Option<String>,
}

impl Quest {
    fn new(questname: impl Into<String>) -> Self {
        Self {
            id: QuestId::new(),
            questname: questname.into(),
            created: unix_now(),
            active: true,
            approved: false,
            completed_by: None,
            description: None,
            reward: None,
        }
    }

    /// Derive the lifecycle state from the stored flags.
    pub fn status(&self) -> QuestStatus {
        if self.approved {
            QuestStatus::Approved
        } else if self.active {
            QuestStatus::Open
        } else if self.completed_by.is_some() {
            QuestStatus::PendingApproval
        } else {
            QuestStatus::Closed
        }
    }
}

/// Resolve a quest entity to its graph node.
pub(crate) fn resolve_quest<R: GraphReader + ?Sized>(
    reader: &R,
    quest: &Quest,
) -> Result<Node, QuestCoreError> {
    reader
        .find_one(Label::Quest, "id", &json!(quest.id))?
        .ok_or_else(|| QuestCoreError::NotFound {
            kind: EntityKind::Quest,
            name: quest.questname.clone(),
        })
}

/// The quest service.
pub struct Quests<S> {
    store: Arc<S>,
}

impl<S: GraphStore> Quests<S> {
    /// Create the service over a store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a quest under a group with a multi-part virtual reward.
    ///
    /// If the group already has an *active* quest with this name, that quest
    /// is returned unchanged and nothing is written; a closed quest with the
    /// same name does not block creation. Otherwise the quest node, the
    /// creator's `created` edge, the group's `has_quest` edge, and one
    /// reward line per entry all commit in a single transaction.
    ///
    /// The creator is permanently ineligible to complete their own quest.
    pub fn register(
        &self,
        group: &Usergroup,
        creator: &User,
        questname: &str,
        virtual_reward: &VirtualReward,
    ) -> Result<Quest, QuestCoreError> {
        if questname.is_empty() {
            return Err(QuestCoreError::InvalidInput(
                "questname must be at least one character".to_string(),
            ));
        }

        let quest = self.store.run_atomic(|txn| -> Result<Quest, QuestCoreError> {
            let group_node = resolve_group(&*txn, group)?;
            let creator_node = resolve_user(&*txn, creator)?;

            if let Some(existing) = active_quest_by_name(&*txn, group_node.id, questname)? {
                return Ok(existing);
            }

            let quest = Quest::new(questname);
            let quest_node = txn.create_node(Label::Quest, encode(&quest)?)?;
            txn.create_edge(creator_node.id, EdgeType::Created, quest_node.id)?;
            txn.create_edge(group_node.id, EdgeType::HasQuest, quest_node.id)?;

            for (kind, amount) in virtual_reward {
                let line = RewardLine::new(kind.clone(), *amount);
                let line_node = txn.create_node(Label::RewardLine, encode(&line)?)?;
                txn.create_edge(quest_node.id, EdgeType::Pays, line_node.id)?;
            }
            Ok(quest)
        })?;

        tracing::info!(
            questname = %quest.questname,
            group = %group.groupname,
            creator = %creator.username,
            "quest registered"
        );
        Ok(quest)
    }

    /// Grant a user eligibility to complete the quest.
    ///
    /// Fails with [`QuestCoreError::CreatorIneligible`] for the quest's
    /// author and [`QuestCoreError::AlreadyEligible`] if the eligibility
    /// edge already exists.
    pub fn add_quester(&self, quest: &Quest, user: &User) -> Result<(), QuestCoreError> {
        self.store.run_atomic(|txn| {
            let quest_node = resolve_quest(&*txn, quest)?;
            let user_node = resolve_user(&*txn, user)?;

            let authored = txn.match_edges(
                &EdgeFilter::new()
                    .ending_at(quest_node.id)
                    .typed(EdgeType::Created),
            )?;
            if authored.iter().any(|e| e.from == user_node.id) {
                return Err(QuestCoreError::CreatorIneligible);
            }

            if has_edge(&*txn, user_node.id, EdgeType::CanComplete, quest_node.id)? {
                return Err(QuestCoreError::AlreadyEligible);
            }

            txn.create_edge(user_node.id, EdgeType::CanComplete, quest_node.id)?;
            Ok(())
        })
    }

    /// Claim completion of an open quest.
    ///
    /// Requires a `can_complete` edge ([`QuestCoreError::NotEligible`]
    /// otherwise). Records the completer and deactivates the quest; payout
    /// waits for [`Quests::approve`].
    pub fn complete(&self, quest: &Quest, user: &User) -> Result<Quest, QuestCoreError> {
        let updated = self.store.run_atomic(|txn| {
            let quest_node = resolve_quest(&*txn, quest)?;
            let user_node = resolve_user(&*txn, user)?;

            if !has_edge(&*txn, user_node.id, EdgeType::CanComplete, quest_node.id)? {
                return Err(QuestCoreError::NotEligible);
            }

            let current: Quest = quest_node.decode()?;
            if current.status() != QuestStatus::Open {
                return Err(QuestCoreError::InvalidStateTransition {
                    from: current.status(),
                    action: "complete",
                });
            }

            let updated = Quest {
                active: false,
                completed_by: Some(user.id),
                ..current
            };
            txn.update_properties(quest_node.id, encode(&updated)?)?;
            Ok(updated)
        })?;

        tracing::info!(
            questname = %updated.questname,
            completer = %user.username,
            "quest completed, awaiting approval"
        );
        Ok(updated)
    }

    /// Approve a pending completion and pay out the reward lines.
    ///
    /// Only valid from pending approval; a repeated approve is rejected as
    /// an invalid transition, so payout runs exactly once per quest. The
    /// approval flag and the completer's updated counters commit in the
    /// same transaction.
    pub fn approve(&self, quest: &Quest) -> Result<Quest, QuestCoreError> {
        let updated = self.store.run_atomic(|txn| {
            let quest_node = resolve_quest(&*txn, quest)?;
            let current: Quest = quest_node.decode()?;

            let (QuestStatus::PendingApproval, Some(completer)) =
                (current.status(), current.completed_by)
            else {
                return Err(QuestCoreError::InvalidStateTransition {
                    from: current.status(),
                    action: "approve",
                });
            };

            let updated = Quest {
                approved: true,
                ..current
            };
            txn.update_properties(quest_node.id, encode(&updated)?)?;
            pay_out(txn, quest_node.id, completer)?;
            Ok(updated)
        })?;

        tracing::info!(questname = %updated.questname, "quest approved and paid out");
        Ok(updated)
    }

    /// Deny a pending completion, reopening the quest.
    ///
    /// Clears the completer and reactivates; eligibility edges are not
    /// revoked, so the denied user may complete again.
    pub fn deny(&self, quest: &Quest) -> Result<Quest, QuestCoreError> {
        let updated = self.store.run_atomic(|txn| {
            let quest_node = resolve_quest(&*txn, quest)?;
            let current: Quest = quest_node.decode()?;

            if current.status() != QuestStatus::PendingApproval {
                return Err(QuestCoreError::InvalidStateTransition {
                    from: current.status(),
                    action: "deny",
                });
            }

            let updated = Quest {
                active: true,
                completed_by: None,
                ..current
            };
            txn.update_properties(quest_node.id, encode(&updated)?)?;
            Ok(updated)
        })?;

        tracing::info!(questname = %updated.questname, "quest completion denied, reopened");
        Ok(updated)
    }

    /// Set the quest's description. No state-machine effect.
    pub fn add_description(
        &self,
        quest: &Quest,
        text: impl Into<String>,
    ) -> Result<Quest, QuestCoreError> {
        let text = text.into();
        self.update_quest(quest, |current| Quest {
            description: Some(text),
            ..current
        })
    }

    /// Set the quest's human-readable non-virtual reward. No state-machine
    /// effect.
    pub fn add_reward(
        &self,
        quest: &Quest,
        reward: impl Into<String>,
    ) -> Result<Quest, QuestCoreError> {
        let reward = reward.into();
        self.update_quest(quest, |current| Quest {
            reward: Some(reward),
            ..current
        })
    }

    /// The group's active quest with this name, if any.
    pub fn lookup(
        &self,
        group: &Usergroup,
        questname: &str,
    ) -> Result<Option<Quest>, QuestCoreError> {
        let group_node = resolve_group(&*self.store, group)?;
        active_quest_by_name(&*self.store, group_node.id, questname)
    }

    /// Lookup by quest ID, active or not.
    pub fn lookup_by_id(&self, id: QuestId) -> Result<Option<Quest>, QuestCoreError> {
        match self.store.find_one(Label::Quest, "id", &json!(id))? {
            Some(node) => Ok(Some(node.decode()?)),
            None => Ok(None),
        }
    }

    /// The quest's reward lines, in store enumeration order.
    pub fn reward_lines(&self, quest: &Quest) -> Result<Vec<RewardLine>, QuestCoreError> {
        let quest_node = resolve_quest(&*self.store, quest)?;
        let pays = self.store.match_edges(
            &EdgeFilter::new()
                .starting_at(quest_node.id)
                .typed(EdgeType::Pays),
        )?;

        let mut lines = Vec::with_capacity(pays.len());
        for edge in pays {
            let line_node = self
                .store
                .node(edge.to)?
                .ok_or(StoreError::UnknownNode(edge.to))?;
            lines.push(line_node.decode()?);
        }
        Ok(lines)
    }

    /// The quest's author.
    pub fn creator_of(&self, quest: &Quest) -> Result<User, QuestCoreError> {
        let quest_node = resolve_quest(&*self.store, quest)?;
        let authored = self.store.match_edges(
            &EdgeFilter::new()
                .ending_at(quest_node.id)
                .typed(EdgeType::Created),
        )?;
        let edge = authored.first().ok_or_else(|| QuestCoreError::NotFound {
            kind: EntityKind::User,
            name: format!("creator of {}", quest.questname),
        })?;
        let user_node = self
            .store
            .node(edge.from)?
            .ok_or(StoreError::UnknownNode(edge.from))?;
        Ok(user_node.decode()?)
    }

    /// Every user holding eligibility for the quest.
    pub fn questers_of(&self, quest: &Quest) -> Result<Vec<User>, QuestCoreError> {
        let quest_node = resolve_quest(&*self.store, quest)?;
        let eligible = self.store.match_edges(
            &EdgeFilter::new()
                .ending_at(quest_node.id)
                .typed(EdgeType::CanComplete),
        )?;

        let mut users = Vec::with_capacity(eligible.len());
        for edge in eligible {
            let user_node = self
                .store
                .node(edge.from)?
                .ok_or(StoreError::UnknownNode(edge.from))?;
            users.push(user_node.decode()?);
        }
        Ok(users)
    }

    fn update_quest(
        &self,
        quest: &Quest,
        apply: impl FnOnce(Quest) -> Quest,
    ) -> Result<Quest, QuestCoreError> {
        self.store.run_atomic(|txn| -> Result<Quest, QuestCoreError> {
            let quest_node = resolve_quest(&*txn, quest)?;
            let current: Quest = quest_node.decode()?;
            let updated = apply(current);
            txn.update_properties(quest_node.id, encode(&updated)?)?;
            Ok(updated)
        })
    }
}

/// Scan the group's `has_quest` edges for an active quest with this name.
fn active_quest_by_name<R: GraphReader + ?Sized>(
    reader: &R,
    group_node: NodeId,
    questname: &str,
) -> Result<Option<Quest>, QuestCoreError> {
    let hosted = reader.match_edges(
        &EdgeFilter::new()
            .starting_at(group_node)
            .typed(EdgeType::HasQuest),
    )?;
    for edge in hosted {
        let quest_node = reader
            .node(edge.to)?
            .ok_or(StoreError::UnknownNode(edge.to))?;
        let quest: Quest = quest_node.decode()?;
        if quest.questname == questname && quest.active {
            return Ok(Some(quest));
        }
    }
    Ok(None)
}

/// Apply every reward line of the quest to the completer's counters.
/// Callers guard this behind the approve transition.
fn pay_out(
    txn: &mut dyn GraphWriter,
    quest_node: NodeId,
    completer: UserId,
) -> Result<(), QuestCoreError> {
    let user_node = txn
        .find_one(Label::User, "id", &json!(completer))?
        .ok_or_else(|| QuestCoreError::NotFound {
            kind: EntityKind::User,
            name: completer.to_string(),
        })?;
    let mut user: User = user_node.decode()?;

    let pays = txn.match_edges(
        &EdgeFilter::new()
            .starting_at(quest_node)
            .typed(EdgeType::Pays),
    )?;
    for edge in &pays {
        let line_node = txn
            .node(edge.to)?
            .ok_or(StoreError::UnknownNode(edge.to))?;
        let line: RewardLine = line_node.decode()?;
        user.grant(&line.kind, line.amount);
        tracing::debug!(
            completer = %user.username,
            kind = %line.kind,
            amount = line.amount,
            "reward line paid"
        );
    }

    txn.update_properties(user_node.id, encode(&user)?)?;
    Ok(())
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::PlainHasher;
    use crate::graph::MemoryGraph;
    use crate::group::Groups;
    use crate::user::Identity;
    use std::collections::BTreeMap;

    struct Fixture {
        identity: Identity<MemoryGraph>,
        groups: Groups<MemoryGraph>,
        quests: Quests<MemoryGraph>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryGraph::with_default_constraints());
        Fixture {
            identity: Identity::new(store.clone(), Arc::new(PlainHasher)),
            groups: Groups::new(store.clone()),
            quests: Quests::new(store),
        }
    }

    fn reward(pairs: &[(&str, i64)]) -> VirtualReward {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// doug owns "guild" and posts "quest1" paying 100 xp and 100 gold;
    /// bob is a registered bystander.
    fn standard_setup(f: &Fixture) -> (User, User, Usergroup, Quest) {
        let doug = f.identity.register("doug", "dougspw").unwrap();
        let bob = f.identity.register("bob", "bobspw").unwrap();
        let guild = f.groups.register("guild", &doug).unwrap();
        let quest = f
            .quests
            .register(&guild, &doug, "quest1", &reward(&[("xp", 100), ("gold", 100)]))
            .unwrap();
        (doug, bob, guild, quest)
    }

    #[test]
    fn test_register_creates_open_quest_with_reward_lines() {
        let f = fixture();
        let (_doug, _bob, _guild, quest) = standard_setup(&f);

        assert_eq!(quest.status(), QuestStatus::Open);
        assert!(quest.active);
        assert!(!quest.approved);
        assert!(quest.completed_by.is_none());

        let mut lines = f.quests.reward_lines(&quest).unwrap();
        lines.sort_by(|a, b| a.kind.cmp(&b.kind));
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].kind.as_str(), lines[0].amount), ("gold", 100));
        assert_eq!((lines[1].kind.as_str(), lines[1].amount), ("xp", 100));
    }

    #[test]
    fn test_register_same_active_name_is_a_noop() {
        let f = fixture();
        let (doug, _bob, guild, quest) = standard_setup(&f);

        let again = f
            .quests
            .register(&guild, &doug, "quest1", &reward(&[("xp", 9999)]))
            .unwrap();
        assert_eq!(again.id, quest.id);
        // The no-op must not have attached more reward lines.
        assert_eq!(f.quests.reward_lines(&quest).unwrap().len(), 2);
    }

    #[test]
    fn test_closed_name_is_reusable() {
        let f = fixture();
        let (doug, bob, guild, quest) = standard_setup(&f);

        // Run the first quest to its terminal state.
        f.quests.add_quester(&quest, &bob).unwrap();
        f.quests.complete(&quest, &bob).unwrap();
        let quest = f.quests.lookup_by_id(quest.id).unwrap().unwrap();
        f.quests.approve(&quest).unwrap();

        let fresh = f
            .quests
            .register(&guild, &doug, "quest1", &reward(&[("xp", 10)]))
            .unwrap();
        assert_ne!(fresh.id, quest.id);
        assert_eq!(fresh.status(), QuestStatus::Open);
    }

    #[test]
    fn test_same_name_under_different_groups() {
        let f = fixture();
        let (doug, _bob, _guild, quest) = standard_setup(&f);

        let lodge = f.groups.register("lodge", &doug).unwrap();
        let other = f
            .quests
            .register(&lodge, &doug, "quest1", &reward(&[("xp", 1)]))
            .unwrap();
        assert_ne!(other.id, quest.id);
    }

    #[test]
    fn test_creator_cannot_become_quester() {
        let f = fixture();
        let (doug, _bob, _guild, quest) = standard_setup(&f);

        assert!(matches!(
            f.quests.add_quester(&quest, &doug),
            Err(QuestCoreError::CreatorIneligible)
        ));
    }

    #[test]
    fn test_add_quester_rejects_duplicates() {
        let f = fixture();
        let (_doug, bob, _guild, quest) = standard_setup(&f);

        f.quests.add_quester(&quest, &bob).unwrap();
        assert!(matches!(
            f.quests.add_quester(&quest, &bob),
            Err(QuestCoreError::AlreadyEligible)
        ));

        let questers = f.quests.questers_of(&quest).unwrap();
        assert_eq!(questers.len(), 1);
        assert_eq!(questers[0].username, "bob");
    }

    #[test]
    fn test_complete_requires_eligibility() {
        let f = fixture();
        let (_doug, bob, _guild, quest) = standard_setup(&f);

        assert!(matches!(
            f.quests.complete(&quest, &bob),
            Err(QuestCoreError::NotEligible)
        ));
    }

    #[test]
    fn test_complete_moves_to_pending_approval() {
        let f = fixture();
        let (_doug, bob, _guild, quest) = standard_setup(&f);

        f.quests.add_quester(&quest, &bob).unwrap();
        let pending = f.quests.complete(&quest, &bob).unwrap();

        assert_eq!(pending.status(), QuestStatus::PendingApproval);
        assert_eq!(pending.completed_by, Some(bob.id));
        assert!(!pending.active);

        // A second complete while pending is an invalid transition.
        assert!(matches!(
            f.quests.complete(&pending, &bob),
            Err(QuestCoreError::InvalidStateTransition {
                from: QuestStatus::PendingApproval,
                ..
            })
        ));
    }

    #[test]
    fn test_approve_pays_out_exactly_once() {
        let f = fixture();
        let (_doug, bob, _guild, quest) = standard_setup(&f);

        f.quests.add_quester(&quest, &bob).unwrap();
        let pending = f.quests.complete(&quest, &bob).unwrap();
        let approved = f.quests.approve(&pending).unwrap();

        assert_eq!(approved.status(), QuestStatus::Approved);
        assert!(approved.approved);
        assert!(!approved.active);

        let bob = f.identity.lookup("bob").unwrap().unwrap();
        assert_eq!(bob.xp, 100);
        assert_eq!(bob.gold, 100);

        // A second approve is rejected and must not double-pay.
        assert!(matches!(
            f.quests.approve(&approved),
            Err(QuestCoreError::InvalidStateTransition {
                from: QuestStatus::Approved,
                ..
            })
        ));
        let bob = f.identity.lookup("bob").unwrap().unwrap();
        assert_eq!(bob.xp, 100);
        assert_eq!(bob.gold, 100);
    }

    #[test]
    fn test_approve_requires_pending_completion() {
        let f = fixture();
        let (_doug, _bob, _guild, quest) = standard_setup(&f);

        assert!(matches!(
            f.quests.approve(&quest),
            Err(QuestCoreError::InvalidStateTransition {
                from: QuestStatus::Open,
                ..
            })
        ));
    }

    #[test]
    fn test_deny_reopens_and_allows_recompletion() {
        let f = fixture();
        let (_doug, bob, _guild, quest) = standard_setup(&f);

        f.quests.add_quester(&quest, &bob).unwrap();
        let pending = f.quests.complete(&quest, &bob).unwrap();
        let reopened = f.quests.deny(&pending).unwrap();

        assert_eq!(reopened.status(), QuestStatus::Open);
        assert!(reopened.completed_by.is_none());

        // No payout happened.
        let bob_after_deny = f.identity.lookup("bob").unwrap().unwrap();
        assert_eq!(bob_after_deny.xp, 0);
        assert_eq!(bob_after_deny.gold, 0);

        // Eligibility survived the deny; bob can go again.
        let pending_again = f.quests.complete(&reopened, &bob).unwrap();
        assert_eq!(pending_again.status(), QuestStatus::PendingApproval);
        assert_eq!(pending_again.completed_by, Some(bob.id));
    }

    #[test]
    fn test_deny_requires_pending_completion() {
        let f = fixture();
        let (_doug, _bob, _guild, quest) = standard_setup(&f);

        assert!(matches!(
            f.quests.deny(&quest),
            Err(QuestCoreError::InvalidStateTransition {
                from: QuestStatus::Open,
                ..
            })
        ));
    }

    #[test]
    fn test_arbitrary_reward_kinds_use_generic_counters() {
        let f = fixture();
        let doug = f.identity.register("doug", "dougspw").unwrap();
        let bob = f.identity.register("bob", "bobspw").unwrap();
        let guild = f.groups.register("guild", &doug).unwrap();
        let quest = f
            .quests
            .register(&guild, &doug, "odd-jobs", &reward(&[("karma", 7), ("xp", 5)]))
            .unwrap();

        f.quests.add_quester(&quest, &bob).unwrap();
        let pending = f.quests.complete(&quest, &bob).unwrap();
        f.quests.approve(&pending).unwrap();

        let bob = f.identity.lookup("bob").unwrap().unwrap();
        assert_eq!(bob.xp, 5);
        assert_eq!(bob.counter("karma"), 7);
        assert_eq!(bob.gold, 0);
    }

    #[test]
    fn test_description_and_reward_setters() {
        let f = fixture();
        let (_doug, _bob, _guild, quest) = standard_setup(&f);

        let quest = f
            .quests
            .add_description(&quest, "Chop wood for the winter stores.")
            .unwrap();
        let quest = f.quests.add_reward(&quest, "a warm meal").unwrap();

        assert_eq!(quest.status(), QuestStatus::Open);

        let stored = f.quests.lookup_by_id(quest.id).unwrap().unwrap();
        assert_eq!(
            stored.description.as_deref(),
            Some("Chop wood for the winter stores.")
        );
        assert_eq!(stored.reward.as_deref(), Some("a warm meal"));
    }

    #[test]
    fn test_lookup_scopes_to_active_quests() {
        let f = fixture();
        let (_doug, bob, guild, quest) = standard_setup(&f);

        assert_eq!(
            f.quests.lookup(&guild, "quest1").unwrap().unwrap().id,
            quest.id
        );

        f.quests.add_quester(&quest, &bob).unwrap();
        f.quests.complete(&quest, &bob).unwrap();

        // Inactive while pending approval, so the scoped lookup misses it.
        assert!(f.quests.lookup(&guild, "quest1").unwrap().is_none());
    }

    #[test]
    fn test_creator_of() {
        let f = fixture();
        let (doug, _bob, _guild, quest) = standard_setup(&f);

        let creator = f.quests.creator_of(&quest).unwrap();
        assert_eq!(creator.id, doug.id);
    }

    #[test]
    fn test_empty_reward_map_is_allowed() {
        let f = fixture();
        let doug = f.identity.register("doug", "dougspw").unwrap();
        let bob = f.identity.register("bob", "bobspw").unwrap();
        let guild = f.groups.register("guild", &doug).unwrap();
        let quest = f
            .quests
            .register(&guild, &doug, "thankless", &BTreeMap::new())
            .unwrap();

        f.quests.add_quester(&quest, &bob).unwrap();
        let pending = f.quests.complete(&quest, &bob).unwrap();
        let approved = f.quests.approve(&pending).unwrap();

        assert_eq!(approved.status(), QuestStatus::Approved);
        let bob = f.identity.lookup("bob").unwrap().unwrap();
        assert_eq!(bob.xp, 0);
        assert_eq!(bob.gold, 0);
    }
}
