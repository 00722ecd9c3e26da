//! Performance benchmarks for the payroll engine.
//!
//! Covers the hot paths of a payroll run:
//! - Monthly schedule and attendance report for one employee
//! - One employee's payroll computed from a populated store
//! - A roster of 100 employees
//! - A roster requested over HTTP
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{AttendanceEvaluator, PayrollCalculator, ShiftScheduler};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{AttendanceRecord, DateRange, Employee};
use payroll_engine::store::{InMemoryStore, PayrollStore};

use axum::{body::Body, http::Request};
use chrono::{Datelike, NaiveTime, Weekday};
use tower::ServiceExt;

const POSITIONS: [&str; 4] = ["Manager", "Sales", "Production Worker A", "Janitor"];

fn load_config() -> std::sync::Arc<payroll_engine::config::PayrollConfig> {
    ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .config()
}

/// Builds a store with `count` employees who clocked in every weekday of March 2026.
fn populated_store(count: usize) -> InMemoryStore {
    let mut store = InMemoryStore::new();
    let time_in = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
    let time_out = NaiveTime::from_hms_opt(17, 30, 0).unwrap();

    for i in 0..count {
        let id = format!("EMP-{:04}", i + 1);
        store
            .insert_employee(Employee {
                id: id.clone(),
                name: format!("Bench Employee {}", i + 1),
                position: POSITIONS[i % POSITIONS.len()].to_string(),
                department: "Operations".to_string(),
                monthly_salary: Decimal::new(22_000, 0),
            })
            .unwrap();

        for date in DateRange::month(2026, 3).unwrap().days() {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            store
                .upsert_attendance(AttendanceRecord {
                    employee_id: id.clone(),
                    date,
                    time_in: Some(time_in),
                    time_out: Some(time_out),
                })
                .unwrap();
        }
    }
    store
}

fn bench_schedule_and_attendance(c: &mut Criterion) {
    let config = load_config();
    let scheduler = ShiftScheduler::new(config.clone());
    let evaluator = AttendanceEvaluator::new(config);
    let store = populated_store(1);

    c.bench_function("monthly_schedule", |b| {
        b.iter(|| black_box(scheduler.schedule(&store, black_box("EMP-0001"), 3, 2026).unwrap()))
    });
    c.bench_function("attendance_report", |b| {
        b.iter(|| black_box(evaluator.report(&store, black_box("EMP-0001"), 3, 2026).unwrap()))
    });
}

fn bench_single_payroll(c: &mut Criterion) {
    let calculator = PayrollCalculator::new(load_config());
    let store = populated_store(1);

    c.bench_function("single_payroll", |b| {
        b.iter(|| {
            black_box(
                calculator
                    .calculate(&store, black_box("EMP-0001"), 3, 2026, 1)
                    .unwrap(),
            )
        })
    });
}

fn bench_roster_scaling(c: &mut Criterion) {
    let calculator = PayrollCalculator::new(load_config());
    let mut group = c.benchmark_group("roster");

    for count in [10usize, 100] {
        let store = populated_store(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("employees", count), &count, |b, _| {
            b.iter(|| black_box(calculator.roster(&store, 3, 2026, 2).unwrap()))
        });
    }

    group.finish();
}

fn bench_roster_http(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_config());
    for i in 0..20 {
        state
            .service()
            .add_employee(Employee {
                id: format!("EMP-{:04}", i + 1),
                name: format!("Bench Employee {}", i + 1),
                position: "Janitor".to_string(),
                department: "Facilities".to_string(),
                monthly_salary: Decimal::new(15_000, 0),
            })
            .unwrap();
    }
    let router = create_router(state);

    c.bench_function("roster_http_20", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payroll?month=3&year=2026&period=1")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_schedule_and_attendance,
    bench_single_payroll,
    bench_roster_scaling,
    bench_roster_http,
);
criterion_main!(benches);
