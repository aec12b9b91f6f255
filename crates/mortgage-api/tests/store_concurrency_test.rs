//! Concurrency tests for the in-memory result store
//!
//! Many writers and readers hit one store at once; ids must stay unique and
//! dense, and readers must never observe a torn entry.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use mortgage_api::config::MortgageConfig;
use mortgage_api::store::{InMemoryResultStore, ResultStore};
use mortgage_api::{AppState, create_app};
use mortgage_calculator::{AnnuityCalculator, Calculator, FixedClock, RateTable};
use mortgage_types::{LoanCalculation, LoanRequest, Program};
use serde_json::json;
use tower::ServiceExt;

fn calculator() -> AnnuityCalculator {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    AnnuityCalculator::new(RateTable::default(), Arc::new(clock)).unwrap()
}

fn calculation(calculator: &AnnuityCalculator, object_cost: f64) -> LoanCalculation {
    let request = LoanRequest {
        object_cost,
        initial_payment: object_cost / 4.0,
        term_months: 120,
        program: Program::ALL[object_cost as usize % 3],
    };
    calculator.calculate(&request).unwrap()
}

#[test]
fn test_concurrent_stores_assign_unique_dense_ids() {
    let num_threads = 8;
    let stores_per_thread = 250;
    let store = Arc::new(InMemoryResultStore::new());
    let barrier = Arc::new(Barrier::new(num_threads));
    let mut handles = Vec::new();

    for thread_id in 0..num_threads {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let calculator = calculator();
            barrier.wait();

            let mut ids = Vec::with_capacity(stores_per_thread);
            for i in 0..stores_per_thread {
                let mut calc = calculation(&calculator, 1_000_000.0 + (thread_id * 1000 + i) as f64);
                let id = store.store(&mut calc);
                assert_eq!(calc.id, Some(id));
                ids.push(id);
            }
            ids
        }));
    }

    let mut all_ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all_ids.insert(id), "id {id} handed out twice");
        }
    }

    let total = (num_threads * stores_per_thread) as u64;
    assert_eq!(all_ids, (1..=total).collect::<HashSet<_>>());
    assert_eq!(store.len(), total as usize);

    let listed: HashSet<_> = store.get_all().iter().filter_map(|calc| calc.id).collect();
    assert_eq!(listed, all_ids);
}

#[test]
fn test_readers_see_complete_entries_during_writes() {
    let writers = 4;
    let readers = 4;
    let stores_per_writer = 200;
    let store = Arc::new(InMemoryResultStore::new());
    let barrier = Arc::new(Barrier::new(writers + readers));
    let mut handles = Vec::new();

    for writer in 0..writers {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            let calculator = calculator();
            barrier.wait();
            for i in 0..stores_per_writer {
                let mut calc = calculation(&calculator, 2_000_000.0 + (writer * 1000 + i) as f64);
                store.store(&mut calc);
            }
        }));
    }

    for _ in 0..readers {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut last_seen = 0;
            for _ in 0..100 {
                let snapshot = store.get_all();
                // The store only grows.
                assert!(snapshot.len() >= last_seen);
                last_seen = snapshot.len();

                for calc in &snapshot {
                    let id = calc.id.expect("stored entries carry an id");
                    assert!(id >= 1);
                    assert_eq!(calc.aggregates.loan_sum, calc.params.object_cost - calc.params.initial_payment);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), writers * stores_per_writer);
}

#[test]
fn test_get_all_is_stable_without_writes() {
    let calculator = calculator();
    let store = InMemoryResultStore::new();
    for cost in [1_000_000.0, 2_000_000.0, 3_000_000.0] {
        store.store(&mut calculation(&calculator, cost));
    }

    let first: HashSet<_> = store.get_all().into_iter().filter_map(|calc| calc.id).collect();
    let second: HashSet<_> = store.get_all().into_iter().filter_map(|calc| calc.id).collect();
    assert_eq!(first, second);
    assert_eq!(first, HashSet::from([1, 2, 3]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_execute_requests() {
    let store = Arc::new(InMemoryResultStore::new());
    let state = AppState::new(Arc::new(calculator()), store.clone());
    let app = create_app(Arc::new(state), &MortgageConfig::default());

    let mut tasks = Vec::new();
    for i in 0..50u32 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let program = Program::ALL[i as usize % 3].as_str();
            let body = json!({
                "object_cost": 3_000_000 + i,
                "initial_payment": 1_000_000,
                "months": 180,
                "program": { program: true }
            });
            let request = Request::builder()
                .method("POST")
                .uri("/execute")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let ids: HashSet<_> = store.get_all().into_iter().filter_map(|calc| calc.id).collect();
    assert_eq!(ids, (1..=50).collect::<HashSet<u64>>());
}
