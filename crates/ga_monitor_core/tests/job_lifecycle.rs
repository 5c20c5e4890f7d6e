use chrono::{TimeZone, Utc};
use ga_monitor_core::{Job, JobId, JobStatus, TransitionError};

fn new_job() -> Job {
    Job::new(JobId::new("v1"), Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
}

#[test]
fn pending_job_becomes_active_then_completed() {
    let mut job = new_job();
    assert_eq!(job.status(), JobStatus::Pending);

    job.transition(JobStatus::Active).unwrap();
    job.transition(JobStatus::Active).unwrap();
    job.transition(JobStatus::Completed).unwrap();

    assert_eq!(job.status(), JobStatus::Completed);
    assert!(!job.is_live());
}

#[test]
fn pending_job_can_fail_or_be_cancelled_directly() {
    let mut failed = new_job();
    failed.transition(JobStatus::Failed).unwrap();
    assert_eq!(failed.status(), JobStatus::Failed);

    let mut cancelled = new_job();
    cancelled.transition(JobStatus::Cancelled).unwrap();
    assert_eq!(cancelled.status(), JobStatus::Cancelled);
}

#[test]
fn terminal_states_have_no_way_out() {
    for terminal in [
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ] {
        let mut job = new_job();
        job.transition(terminal).unwrap();

        for next in [
            JobStatus::Pending,
            JobStatus::Active,
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            let err = job.transition(next).unwrap_err();
            assert_eq!(
                err,
                TransitionError {
                    job_id: JobId::new("v1"),
                    from: terminal,
                    to: next,
                }
            );
            assert_eq!(job.status(), terminal);
        }
    }
}

#[test]
fn active_job_never_returns_to_pending() {
    let mut job = new_job();
    job.transition(JobStatus::Active).unwrap();
    assert!(job.transition(JobStatus::Pending).is_err());
    assert_eq!(job.status(), JobStatus::Active);
}

#[test]
fn poll_time_is_frozen_once_terminal() {
    let mut job = new_job();
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 1).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 9).unwrap();

    job.mark_polled(first);
    job.transition(JobStatus::Cancelled).unwrap();
    job.mark_polled(late);

    assert_eq!(job.last_polled_at(), Some(first));
}

#[test]
fn transition_error_names_the_job() {
    let mut job = new_job();
    job.transition(JobStatus::Failed).unwrap();
    let err = job.transition(JobStatus::Active).unwrap_err();
    assert_eq!(err.to_string(), "job v1 cannot move from failed to active");
}
