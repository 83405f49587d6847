//! Benchmarks for slot scoring and full-plan computation.
//!
//! The scorer sits in the planner's inner loop (one call per candidate
//! slot per task), so per-call cost bounds how far the lookahead can
//! stretch.

use chrono::{Duration, NaiveTime, TimeZone, Utc, Weekday};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use custodian::domain::models::{MaintenanceTask, MaintenanceWindow, Recurrence};
use custodian::services::{ActivityModel, OperationHistory, SchedulingPlanner, SlotScorer};

fn overnight_window() -> MaintenanceWindow {
    MaintenanceWindow::new(
        "overnight",
        NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
    )
}

fn benchmark_scorer(c: &mut Criterion) {
    let activity = ActivityModel::new();
    let history = OperationHistory::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap();
    let scorer = SlotScorer::new(&activity, &history, &[], now);
    let task = MaintenanceTask::new("cache-prune", "cache-prune").requiring_low_activity();

    c.bench_function("score_one_slot", |b| {
        b.iter(|| black_box(scorer.score(black_box(&task), now)));
    });

    c.bench_function("score_one_day_of_slots", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for quarter in 0..96 {
                let candidate = now + Duration::minutes(quarter * 15);
                total += scorer.score(&task, candidate).total;
            }
            black_box(total)
        });
    });
}

fn benchmark_planner(c: &mut Criterion) {
    let activity = ActivityModel::new();
    let history = OperationHistory::new();
    let windows = vec![overnight_window()];
    let now = Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap();
    let planner = SchedulingPlanner::new(&activity, &history, &windows);

    let tasks: Vec<MaintenanceTask> = (0..20)
        .map(|i| {
            MaintenanceTask::new(format!("task-{i}"), "cache-prune")
                .with_priority(i * 5)
                .with_recurrence(Recurrence::Adaptive)
        })
        .collect();
    let refs: Vec<&MaintenanceTask> = tasks.iter().collect();

    let mut group = c.benchmark_group("plan");
    group.sample_size(50);
    group.bench_function("plan_20_tasks_24h", |b| {
        b.iter(|| black_box(planner.plan(black_box(&refs), now, 24)));
    });
    group.bench_function("plan_20_tasks_168h", |b| {
        b.iter(|| black_box(planner.plan(black_box(&refs), now, 168)));
    });
    group.finish();
}

criterion_group!(benches, benchmark_scorer, benchmark_planner);
criterion_main!(benches);
