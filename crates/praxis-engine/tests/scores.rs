mod common;

use jiff::Timestamp;
use praxis_core::models::instance::InstanceStatus;
use praxis_core::models::score::Score;
use uuid::Uuid;

use common::{fixture, phq9_id};

fn score(instance_id: Uuid, raw: f64, at: &str) -> Score {
    Score {
        id: Uuid::new_v4(),
        instance_id,
        raw_score: Some(raw),
        scaled_score: None,
        percentile: None,
        t_score: None,
        z_score: None,
        interpretation_category: None,
        interpretation_description: None,
        clinical_significance: None,
        severity_level: None,
        recommendations: None,
        calculated_at: at.parse::<Timestamp>().unwrap(),
    }
}

#[tokio::test]
async fn latest_score_wins_regardless_of_insert_order() {
    let fx = fixture().await;
    let id = fx.seed_instances(phq9_id(), &fx.client_ids()[..1]).await[0].id;
    fx.store.record_score(score(id, 14.0, "2025-01-02T00:00:00Z")).await;
    fx.store.record_score(score(id, 9.0, "2025-01-03T00:00:00Z")).await;
    fx.store.record_score(score(id, 11.0, "2025-01-01T00:00:00Z")).await;

    let latest = fx.engine.latest_score_for(id).await.unwrap().unwrap();

    assert_eq!(latest.raw_score, Some(9.0));
}

#[tokio::test]
async fn unscored_instance_has_no_score() {
    let fx = fixture().await;
    let id = fx.seed_instances(phq9_id(), &fx.client_ids()[..1]).await[0].id;

    assert!(fx.engine.latest_score_for(id).await.unwrap().is_none());
}

#[tokio::test]
async fn client_results_use_current_scores_and_status_filter() {
    let fx = fixture().await;
    let client = fx.clients[0].id;
    let first = fx.seed_instances(phq9_id(), &[client]).await[0].id;
    let second = fx.seed_instances(phq9_id(), &[client]).await[0].id;
    let other_client = fx.seed_instances(phq9_id(), &[fx.clients[1].id]).await[0].id;

    fx.engine.set_status(first, InstanceStatus::Completed).await.unwrap();
    fx.store.record_score(score(first, 20.0, "2025-01-04T00:00:00Z")).await;
    fx.store.record_score(score(first, 18.0, "2025-01-05T00:00:00Z")).await;
    fx.store.record_score(score(second, 5.0, "2025-01-06T00:00:00Z")).await;
    fx.store.record_score(score(other_client, 1.0, "2025-01-07T00:00:00Z")).await;

    let all = fx.engine.results_for_client(client, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].instance.id, second);
    assert_eq!(all[1].instance.id, first);
    assert_eq!(all[1].score.raw_score, Some(18.0));

    let completed = fx
        .engine
        .results_for_client(client, Some(InstanceStatus::Completed))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].instance.id, first);
}
