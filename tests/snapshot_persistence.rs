//! Snapshot persistence across a quest lifecycle.
//!
//! Saves the graph mid-lifecycle, reloads it into a fresh store, and checks
//! that the engine picks up exactly where it left off.

use quest_core::{
    Groups, Identity, MemoryGraph, PlainHasher, QuestStatus, Quests, SavedGraph, VirtualReward,
};
use std::sync::Arc;
use tempfile::TempDir;

fn services(
    store: Arc<MemoryGraph>,
) -> (
    Identity<MemoryGraph>,
    Groups<MemoryGraph>,
    Quests<MemoryGraph>,
) {
    (
        Identity::new(store.clone(), Arc::new(PlainHasher)),
        Groups::new(store.clone()),
        Quests::new(store),
    )
}

#[tokio::test]
async fn lifecycle_survives_a_snapshot_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("mid_lifecycle.json");

    // Run a quest up to pending approval, then snapshot.
    let store = Arc::new(MemoryGraph::with_default_constraints());
    let (identity, groups, quests) = services(store.clone());

    let doug = identity.register("doug", "dougspw").unwrap();
    let bob = identity.register("bob", "bobspw").unwrap();
    let guild = groups.register("guild", &doug).unwrap();
    groups.add_member(&guild, &bob).unwrap();

    let reward: VirtualReward = [("xp".to_string(), 50)].into_iter().collect();
    let quest = quests.register(&guild, &doug, "chop-wood", &reward).unwrap();
    quests.add_quester(&quest, &bob).unwrap();
    let pending = quests.complete(&quest, &bob).unwrap();

    SavedGraph::new(&store)
        .save_json(&path)
        .await
        .expect("Save should succeed");

    // Reload into a brand-new store and finish the lifecycle there.
    let loaded = SavedGraph::load_json(&path).await.expect("Load should succeed");
    let restored = Arc::new(loaded.into_store());
    let (identity, groups, quests) = services(restored);

    let resumed = quests.lookup_by_id(pending.id).unwrap().unwrap();
    assert_eq!(resumed.status(), QuestStatus::PendingApproval);
    assert_eq!(resumed.completed_by, Some(bob.id));

    let approved = quests.approve(&resumed).unwrap();
    assert_eq!(approved.status(), QuestStatus::Approved);

    let bob = identity.lookup("bob").unwrap().unwrap();
    assert_eq!(bob.xp, 50);

    // Credentials and membership came through the snapshot too.
    assert!(identity.verify_password("doug", "dougspw").unwrap());
    let members = groups.members_of(&guild).unwrap();
    assert_eq!(members.len(), 2);

    // Uniqueness constraints still apply after the reload.
    assert!(identity.register("doug", "another").is_err());
}
