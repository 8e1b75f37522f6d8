#![allow(dead_code)]

use rota_core::{
    models::WeekdayKey,
    params::{DaySchedule, TimeRange, UpsertSchedule},
    Config, Scheduler, SchedulerBuilder,
};
use tempfile::TempDir;

/// Helper function to create a test scheduler
pub async fn create_test_scheduler() -> (TempDir, Scheduler) {
    create_test_scheduler_with(Config::default()).await
}

pub async fn create_test_scheduler_with(config: Config) -> (TempDir, Scheduler) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let scheduler = SchedulerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_config(config)
        .build()
        .await
        .expect("Failed to create scheduler");
    (temp_dir, scheduler)
}

/// Weekly pattern with the same hours on each of `days`.
pub fn upsert_params(agent: &str, service: Option<&str>, days: &[WeekdayKey], hours: &[(&str, &str)]) -> UpsertSchedule {
    UpsertSchedule {
        org_id: "org-1".to_string(),
        agent_id: agent.to_string(),
        org_service_id: service.map(String::from),
        weekly_pattern: days
            .iter()
            .map(|day| DaySchedule {
                day: *day,
                time_ranges: hours
                    .iter()
                    .map(|(start, end)| TimeRange::new(*start, *end))
                    .collect(),
            })
            .collect(),
    }
}
