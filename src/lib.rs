//! Graph-backed group quest engine.
//!
//! This crate provides:
//! - A labeled-property graph store capability with atomic transactions
//! - User identity with credential hashing and group membership
//! - Usergroups with ownership and membership semantics
//! - A quest lifecycle engine with multi-part virtual rewards and
//!   exactly-once payout
//!
//! # Quick Start
//!
//! ```
//! use quest_core::{
//!     BcryptHasher, Groups, Identity, MemoryGraph, Quests, VirtualReward,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), quest_core::QuestCoreError> {
//!     let store = Arc::new(MemoryGraph::with_default_constraints());
//!     let identity = Identity::new(store.clone(), Arc::new(BcryptHasher::with_cost(4)));
//!     let groups = Groups::new(store.clone());
//!     let quests = Quests::new(store);
//!
//!     let doug = identity.register("doug", "dougspw")?;
//!     let bob = identity.register("bob", "bobspw")?;
//!     let guild = groups.register("guild", &doug)?;
//!     groups.add_member(&guild, &bob)?;
//!
//!     let reward: VirtualReward = [("xp".to_string(), 50)].into_iter().collect();
//!     let quest = quests.register(&guild, &doug, "chop-wood", &reward)?;
//!     quests.add_quester(&quest, &bob)?;
//!     let pending = quests.complete(&quest, &bob)?;
//!     quests.approve(&pending)?;
//!
//!     assert_eq!(identity.lookup("bob")?.map(|u| u.xp), Some(50));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod graph;
pub mod group;
pub mod persist;
pub mod quest;
pub mod reward;
pub mod user;

// Primary public API
pub use config::StoreConfig;
pub use credentials::{BcryptHasher, CredentialHasher, PlainHasher};
pub use error::{EntityKind, QuestCoreError};
pub use graph::{GraphStore, MemoryGraph};
pub use group::{GroupId, Groups, Usergroup};
pub use persist::{PersistError, SavedGraph};
pub use quest::{Quest, QuestId, QuestStatus, Quests};
pub use reward::{RewardLine, RewardLineId, VirtualReward};
pub use user::{Identity, User, UserId};
