mod common;

use std::sync::Arc;
use std::time::Duration;

use praxis_core::models::instance::InstanceStatus;
use praxis_engine::bridge::ChangeBridge;
use praxis_engine::session::TherapistSession;
use praxis_store::memory::Operation;
use uuid::Uuid;

use common::{Fixture, fixture, phq9_id, wait_for};

fn bridge(fx: &Fixture) -> (Arc<TherapistSession>, ChangeBridge) {
    let session = Arc::new(TherapistSession::new(fx.engine.clone()));
    let bridge = ChangeBridge::new(session.clone(), fx.store.clone());
    (session, bridge)
}

#[tokio::test]
async fn external_insert_triggers_refetch() {
    let fx = fixture().await;
    let (session, bridge) = bridge(&fx);
    session.load(fx.therapist).await;
    bridge.mount(fx.therapist).await.unwrap();
    let mut rx = session.cache().subscribe();

    fx.seed_instances(phq9_id(), &fx.client_ids()[..2]).await;

    wait_for(&mut rx, |s| s.instances.len() == 2 && !s.loading).await;
}

#[tokio::test]
async fn external_status_change_is_picked_up() {
    let fx = fixture().await;
    let id = fx.seed_instances(phq9_id(), &fx.client_ids()[..1]).await[0].id;
    let (session, bridge) = bridge(&fx);
    session.load(fx.therapist).await;
    bridge.mount(fx.therapist).await.unwrap();
    let mut rx = session.cache().subscribe();

    fx.engine.set_status(id, InstanceStatus::Completed).await.unwrap();

    wait_for(&mut rx, |s| {
        s.instances
            .iter()
            .any(|v| v.instance.id == id && v.instance.status == InstanceStatus::Completed)
    })
    .await;
}

#[tokio::test]
async fn remounting_closes_the_previous_subscription() {
    let fx = fixture().await;
    let (_session, bridge) = bridge(&fx);

    bridge.mount(fx.therapist).await.unwrap();
    assert_eq!(fx.store.feed().subscriber_count(), 1);

    let other = Uuid::new_v4();
    bridge.mount(other).await.unwrap();
    assert_eq!(fx.store.feed().subscriber_count(), 1);
    assert_eq!(bridge.mounted_therapist().await, Some(other));
}

#[tokio::test]
async fn mounting_same_therapist_keeps_subscription() {
    let fx = fixture().await;
    let (_session, bridge) = bridge(&fx);

    bridge.mount(fx.therapist).await.unwrap();
    bridge.mount(fx.therapist).await.unwrap();

    assert_eq!(fx.store.call_count(Operation::Subscribe), 1);
    assert_eq!(fx.store.feed().subscriber_count(), 1);
}

#[tokio::test]
async fn unmount_releases_the_subscription() {
    let fx = fixture().await;
    let (_session, bridge) = bridge(&fx);
    bridge.mount(fx.therapist).await.unwrap();

    bridge.unmount().await;

    assert_eq!(fx.store.feed().subscriber_count(), 0);
    assert_eq!(bridge.mounted_therapist().await, None);
}

#[tokio::test]
async fn unmount_during_refetch_does_not_leave_cache_loading() {
    let fx = fixture().await;
    let (session, bridge) = bridge(&fx);
    session.load(fx.therapist).await;
    bridge.mount(fx.therapist).await.unwrap();
    fx.store.set_latency(Operation::JoinedInstances, Duration::from_millis(300));

    fx.seed_instances(phq9_id(), &fx.client_ids()[..1]).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(session.cache().snapshot().loading);

    bridge.unmount().await;

    let snapshot = session.cache().snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.therapist_id, Some(fx.therapist));

    fx.store.set_latency(Operation::JoinedInstances, Duration::ZERO);
    let reloaded = session.load(fx.therapist).await;
    assert_eq!(reloaded.instances.len(), 1);
}

#[tokio::test]
async fn events_for_a_therapist_off_screen_are_ignored() {
    let fx = fixture().await;
    let (session, bridge) = bridge(&fx);
    let other = Uuid::new_v4();
    bridge.mount(fx.therapist).await.unwrap();
    session.load(other).await;
    let loads = fx.store.call_count(Operation::JoinedInstances);

    fx.seed_instances(phq9_id(), &fx.client_ids()[..1]).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(fx.store.call_count(Operation::JoinedInstances), loads);
    assert_eq!(session.cache().therapist_id(), Some(other));
}
