//! Queue jobs and recurring schedulers.
//!
//! The queue backend groups jobs per queue and per state; these types mirror
//! that grouping so the monitor can render it as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Job lifecycle state as reported by the queue backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Waiting,
    Active,
    Delayed,
    Failed,
    Completed,
}

impl JobState {
    pub const ALL: [JobState; 5] = [
        JobState::Waiting,
        JobState::Active,
        JobState::Delayed,
        JobState::Failed,
        JobState::Completed,
    ];

    /// Wire name, also used as the `state` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Waiting => "waiting",
            JobState::Active => "active",
            JobState::Delayed => "delayed",
            JobState::Failed => "failed",
            JobState::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp carried verbatim; the backend sends either epoch millis or a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Millis(ms) => write!(f, "{ms}"),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub id: String,
    pub name: String,
    pub queue_name: String,
    pub state: JobState,
    /// Opaque job payload
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub attempts_made: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_on: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<Timestamp>,
}

/// Jobs of one queue, grouped by state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueJobs {
    #[serde(default)]
    pub waiting: Vec<JobInfo>,
    #[serde(default)]
    pub active: Vec<JobInfo>,
    #[serde(default)]
    pub delayed: Vec<JobInfo>,
    #[serde(default)]
    pub failed: Vec<JobInfo>,
    #[serde(default)]
    pub completed: Vec<JobInfo>,
}

impl QueueJobs {
    pub fn by_state(&self, state: JobState) -> &[JobInfo] {
        match state {
            JobState::Waiting => &self.waiting,
            JobState::Active => &self.active,
            JobState::Delayed => &self.delayed,
            JobState::Failed => &self.failed,
            JobState::Completed => &self.completed,
        }
    }

    pub fn total(&self) -> usize {
        JobState::ALL.iter().map(|s| self.by_state(*s).len()).sum()
    }

    /// Remove a job by id from whichever state holds it
    pub fn remove(&mut self, job_id: &str) -> bool {
        let before = self.total();
        for list in [
            &mut self.waiting,
            &mut self.active,
            &mut self.delayed,
            &mut self.failed,
            &mut self.completed,
        ] {
            list.retain(|job| job.id != job_id);
        }
        self.total() != before
    }

    /// Drop every job, or only those in `state`
    pub fn clear(&mut self, state: Option<JobState>) {
        match state {
            Some(JobState::Waiting) => self.waiting.clear(),
            Some(JobState::Active) => self.active.clear(),
            Some(JobState::Delayed) => self.delayed.clear(),
            Some(JobState::Failed) => self.failed.clear(),
            Some(JobState::Completed) => self.completed.clear(),
            None => *self = QueueJobs::default(),
        }
    }
}

/// Queue name -> jobs grouped by state
pub type AllJobsGrouped = BTreeMap<String, QueueJobs>;

/// Per-state totals across every queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobsSummary {
    pub waiting: usize,
    pub active: usize,
    pub delayed: usize,
    pub failed: usize,
    pub completed: usize,
}

impl JobsSummary {
    pub fn from_grouped(grouped: &AllJobsGrouped) -> Self {
        grouped.values().fold(Self::default(), |acc, q| Self {
            waiting: acc.waiting + q.waiting.len(),
            active: acc.active + q.active.len(),
            delayed: acc.delayed + q.delayed.len(),
            failed: acc.failed + q.failed.len(),
            completed: acc.completed + q.completed.len(),
        })
    }

    pub fn get(&self, state: JobState) -> usize {
        match state {
            JobState::Waiting => self.waiting,
            JobState::Active => self.active,
            JobState::Delayed => self.delayed,
            JobState::Failed => self.failed,
            JobState::Completed => self.completed,
        }
    }
}

/// Recurring job definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerInfo {
    pub id: String,
    pub queue_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<Timestamp>,
    /// Repeat interval in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every: Option<u64>,
    /// Cron-like repeat pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SchedulerInfo {
    /// Human-readable repeat description
    pub fn cadence(&self) -> String {
        match (&self.pattern, self.every) {
            (Some(pattern), _) => format!("cron: {pattern}"),
            (None, Some(ms)) if ms % 1000 == 0 => format!("every {}s", ms / 1000),
            (None, Some(ms)) => format!("every {ms}ms"),
            (None, None) => "-".to_string(),
        }
    }
}

/// Queue name -> schedulers
pub type AllSchedulersGrouped = BTreeMap<String, Vec<SchedulerInfo>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, state: JobState) -> JobInfo {
        JobInfo {
            id: id.to_string(),
            name: "sync-odds".to_string(),
            queue_name: "odds".to_string(),
            state,
            data: serde_json::Value::Null,
            timestamp: Some(Timestamp::Millis(1)),
            attempts_made: 0,
            failed_reason: None,
            processed_on: None,
            finished_on: None,
        }
    }

    #[test]
    fn test_grouped_jobs_wire_format() {
        let json = r#"{
            "odds": {
                "active": [{"id":"1","name":"n","queueName":"odds","state":"active",
                            "data":{"x":1},"timestamp":"1700000000000","attemptsMade":1}],
                "delayed": [], "failed": [], "completed": []
            }
        }"#;
        let grouped: AllJobsGrouped = serde_json::from_str(json).unwrap();
        let odds = &grouped["odds"];
        assert!(odds.waiting.is_empty());
        assert_eq!(odds.active[0].state, JobState::Active);
        assert_eq!(
            odds.active[0].timestamp,
            Some(Timestamp::Text("1700000000000".to_string()))
        );
    }

    #[test]
    fn test_summary_counts_across_queues() {
        let mut grouped = AllJobsGrouped::new();
        grouped.insert(
            "a".to_string(),
            QueueJobs {
                failed: vec![job("1", JobState::Failed), job("2", JobState::Failed)],
                ..Default::default()
            },
        );
        grouped.insert(
            "b".to_string(),
            QueueJobs {
                failed: vec![job("3", JobState::Failed)],
                active: vec![job("4", JobState::Active)],
                ..Default::default()
            },
        );

        let summary = JobsSummary::from_grouped(&grouped);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.get(JobState::Active), 1);
        assert_eq!(summary.completed, 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut q = QueueJobs {
            active: vec![job("1", JobState::Active)],
            failed: vec![job("2", JobState::Failed)],
            ..Default::default()
        };
        assert!(q.remove("2"));
        assert!(!q.remove("2"));
        assert_eq!(q.total(), 1);

        q.failed.push(job("3", JobState::Failed));
        q.clear(Some(JobState::Failed));
        assert_eq!(q.total(), 1);
        q.clear(None);
        assert_eq!(q.total(), 0);
    }

    #[test]
    fn test_state_parse() {
        assert_eq!(JobState::parse("delayed"), Some(JobState::Delayed));
        assert_eq!(JobState::parse("Delayed"), None);
        assert_eq!(JobState::Completed.to_string(), "completed");
    }

    #[test]
    fn test_scheduler_cadence() {
        let mut s = SchedulerInfo {
            id: "s1".to_string(),
            queue_name: "odds".to_string(),
            next_run: None,
            every: Some(15_000),
            pattern: None,
            data: None,
        };
        assert_eq!(s.cadence(), "every 15s");
        s.every = Some(1500);
        assert_eq!(s.cadence(), "every 1500ms");
        s.pattern = Some("*/5 * * * *".to_string());
        assert_eq!(s.cadence(), "cron: */5 * * * *");
    }
}
