#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use praxis_core::models::client::ClientSummary;
use praxis_core::models::instance::{Instance, InstanceStatus, NewInstance, ReminderFrequency};
use praxis_engine::AssessmentEngine;
use praxis_engine::cache::CacheSnapshot;
use praxis_engine::clock::FixedClock;
use praxis_instruments::Instrument;
use praxis_instruments::instruments::phq9::Phq9;
use praxis_store::memory::MemoryStore;
use praxis_store::store::AssessmentStore;
use tokio::sync::watch;
use uuid::Uuid;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub engine: Arc<AssessmentEngine>,
    pub clock: Arc<FixedClock>,
    pub therapist: Uuid,
    pub clients: Vec<ClientSummary>,
}

pub fn now() -> Timestamp {
    "2025-01-10T12:00:00Z".parse().unwrap()
}

pub fn phq9_id() -> Uuid {
    Phq9.template_id()
}

pub async fn fixture() -> Fixture {
    let templates = praxis_instruments::builtin_templates(now()).unwrap();
    let store = Arc::new(MemoryStore::with_templates(templates));

    let clients: Vec<ClientSummary> = [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")]
        .into_iter()
        .map(|(first, last)| ClientSummary {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        })
        .collect();
    for client in &clients {
        store.put_client(client.clone()).await;
    }

    let clock = Arc::new(FixedClock::new(now()));
    let engine = Arc::new(AssessmentEngine::new(store.clone()).with_clock(clock.clone()));

    Fixture {
        store,
        engine,
        clock,
        therapist: Uuid::new_v4(),
        clients,
    }
}

impl Fixture {
    pub fn client_ids(&self) -> Vec<Uuid> {
        self.clients.iter().map(|c| c.id).collect()
    }

    /// Insert instances straight into the store, as another device would.
    pub async fn seed_instances(&self, template_id: Uuid, client_ids: &[Uuid]) -> Vec<Instance> {
        let rows = client_ids
            .iter()
            .map(|client_id| NewInstance {
                template_id,
                therapist_id: self.therapist,
                client_id: *client_id,
                case_id: None,
                title: "Seeded".to_string(),
                instructions: None,
                status: InstanceStatus::Assigned,
                reminder_frequency: ReminderFrequency::None,
                due_date: None,
            })
            .collect();
        self.store.insert_instances(rows).await.unwrap()
    }
}

/// Wait until the cache publishes a snapshot satisfying `pred`.
pub async fn wait_for(
    rx: &mut watch::Receiver<CacheSnapshot>,
    pred: impl Fn(&CacheSnapshot) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if pred(&snapshot) {
                    return;
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("cache never reached the expected state");
}
