//! Adaptive scheduler (`spec.md` §4.E): per-job interval adaptation,
//! trigger/enqueue, and cancellation, grounded on
//! `cortex-session::manager::SessionManager`'s `DashMap`-backed concurrent
//! state for the job table.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use substrate_core::config::SchedulerConfig;
use substrate_core::errors::SubstrateError;
use substrate_core::types::{JobState, JobStatus, Mood};

use crate::interval::adapt_interval;

pub struct Scheduler {
    jobs: DashMap<String, JobState>,
    mood: std::sync::RwLock<Mood>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            jobs: DashMap::new(),
            mood: std::sync::RwLock::new(Mood::default()),
            config,
        }
    }

    pub fn restore(jobs: Vec<JobState>, mood: Mood, config: SchedulerConfig) -> Self {
        let map = DashMap::new();
        for job in jobs {
            map.insert(job.name.clone(), job);
        }
        Self {
            jobs: map,
            mood: std::sync::RwLock::new(mood),
            config,
        }
    }

    pub fn snapshot(&self) -> (Vec<JobState>, Mood) {
        let jobs = self.jobs.iter().map(|e| e.value().clone()).collect();
        let mood = self.mood.read().unwrap().clone();
        (jobs, mood)
    }

    /// Register a job if not already present, idempotently.
    pub fn register(&self, name: impl Into<String>, base_interval_secs: f64, now: DateTime<Utc>) {
        let name = name.into();
        self.jobs.entry(name.clone()).or_insert_with(|| JobState::new(name, base_interval_secs, now));
    }

    pub fn set_mood(&self, dim: impl Into<String>, value: f64) {
        self.mood.write().unwrap().set(dim, value);
    }

    pub fn mood(&self) -> Mood {
        self.mood.read().unwrap().clone()
    }

    /// Bypass the interval check for `name`'s next tick (`spec.md` §4.E).
    pub fn trigger(&self, name: &str) -> Result<(), SubstrateError> {
        let mut job = self.jobs.get_mut(name).ok_or_else(|| SubstrateError::NotFound {
            kind: "job",
            id: name.to_string(),
        })?;
        job.force_run_once = true;
        Ok(())
    }

    /// Mark `name` cancelled. A job cancelled mid-run should be checked for
    /// between every `.await` point in the caller's execution (`spec.md`
    /// §5); this flag is the signal the caller polls.
    pub fn cancel(&self, name: &str) -> Result<(), SubstrateError> {
        let mut job = self.jobs.get_mut(name).ok_or_else(|| SubstrateError::NotFound {
            kind: "job",
            id: name.to_string(),
        })?;
        job.status = JobStatus::Cancelled;
        Ok(())
    }

    pub fn is_cancelled(&self, name: &str) -> bool {
        self.jobs.get(name).map(|j| j.status == JobStatus::Cancelled).unwrap_or(false)
    }

    /// Jobs due to run at `now`: past their adapted interval, or force-run.
    /// Serialized per `spec.md` §5 — no job is reported due while another is
    /// already `Running`, so at most one caller execution is in flight.
    pub fn due_jobs(&self, now: DateTime<Utc>) -> Vec<String> {
        if self.jobs.iter().any(|e| e.value().status == JobStatus::Running) {
            return Vec::new();
        }
        self.jobs
            .iter()
            .filter(|e| {
                let job = e.value();
                if job.status == JobStatus::Cancelled {
                    return false;
                }
                if job.force_run_once {
                    return true;
                }
                match job.last_run {
                    None => true,
                    Some(last) => {
                        let elapsed = (now - last).num_milliseconds() as f64 / 1000.0;
                        elapsed >= job.adapted_interval_secs
                    }
                }
            })
            .map(|e| e.key().clone())
            .collect()
    }

    /// Mark `name` as the one job currently executing. `due_jobs` reports no
    /// other job as due until `mark_run` clears this back to idle.
    pub fn begin_run(&self, name: &str) -> Result<(), SubstrateError> {
        let mut job = self.jobs.get_mut(name).ok_or_else(|| SubstrateError::NotFound {
            kind: "job",
            id: name.to_string(),
        })?;
        if job.status != JobStatus::Cancelled {
            job.status = JobStatus::Running;
        }
        Ok(())
    }

    /// Record that `name` ran, producing `signal` (effectiveness in
    /// `[0.0, 1.0]`), and recompute its adapted interval.
    pub fn mark_run(&self, name: &str, now: DateTime<Utc>, signal: f64) -> Result<(), SubstrateError> {
        let mut job = self.jobs.get_mut(name).ok_or_else(|| SubstrateError::NotFound {
            kind: "job",
            id: name.to_string(),
        })?;
        job.last_run = Some(now);
        job.run_count += 1;
        job.force_run_once = false;
        job.push_signal(signal);
        if job.status == JobStatus::Running {
            job.status = JobStatus::Idle;
        }

        let mood = self.mood.read().unwrap().clone();
        let mut rng = rand::thread_rng();
        job.adapted_interval_secs = adapt_interval(&job, &mood, self.config.jitter_min, self.config.jitter_max, &mut rng);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn newly_registered_job_is_immediately_due() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let now = Utc::now();
        scheduler.register("pulse", 5.0, now);
        assert!(scheduler.due_jobs(now).contains(&"pulse".to_string()));
    }

    #[test]
    fn trigger_bypasses_interval_check() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let now = Utc::now();
        scheduler.register("dream", 3600.0, now);
        scheduler.mark_run("dream", now, 0.8).unwrap();
        assert!(!scheduler.due_jobs(now).contains(&"dream".to_string()));

        scheduler.trigger("dream").unwrap();
        assert!(scheduler.due_jobs(now).contains(&"dream".to_string()));
    }

    #[test]
    fn cancelled_job_is_never_due() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let now = Utc::now();
        scheduler.register("dream", 5.0, now);
        scheduler.cancel("dream").unwrap();
        assert!(!scheduler.due_jobs(now + Duration::seconds(100)).contains(&"dream".to_string()));
    }

    #[test]
    fn mark_run_clears_force_run_once_and_advances_last_run() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let now = Utc::now();
        scheduler.register("pulse", 5.0, now);
        scheduler.trigger("pulse").unwrap();
        scheduler.mark_run("pulse", now, 0.5).unwrap();
        assert!(!scheduler.due_jobs(now).contains(&"pulse".to_string()));
    }

    #[test]
    fn running_job_blocks_other_jobs_from_being_reported_due() {
        let scheduler = Scheduler::new(SchedulerConfig::default());
        let now = Utc::now();
        scheduler.register("pulse", 5.0, now);
        scheduler.register("dream", 5.0, now);

        scheduler.begin_run("pulse").unwrap();
        assert!(scheduler.due_jobs(now).is_empty(), "no job should be due while another is running");

        scheduler.mark_run("pulse", now, 0.5).unwrap();
        assert!(scheduler.due_jobs(now + Duration::seconds(10)).contains(&"dream".to_string()));
    }
}
