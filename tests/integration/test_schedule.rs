//! Automatic mode: repeated runs and cancellation

use crate::fixtures::{create_example_fixture, options};
use ds3_backup::{CancellationToken, Error, SnapshotFormat, run_schedule, run_snapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn test_cancel_during_sleep_stops_before_next_run() {
    let token = CancellationToken::new();
    let runs = Arc::new(AtomicU64::new(0));

    let worker = {
        let token = token.clone();
        let runs = Arc::clone(&runs);
        thread::spawn(move || {
            run_schedule(Duration::from_secs(60), &token, || {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    };

    let deadline = Instant::now() + Duration::from_secs(10);
    while runs.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    let cancelled_at = Instant::now();
    token.cancel();
    let total = worker.join().unwrap().unwrap();

    assert_eq!(total, 1);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(cancelled_at.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_repeats_until_cancelled() {
    let token = CancellationToken::new();
    let mut runs = 0;

    let total = run_schedule(Duration::from_millis(1), &token, || {
        runs += 1;
        if runs == 3 {
            token.cancel();
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(total, 3);
}

#[test]
fn test_fatal_error_ends_schedule() {
    let token = CancellationToken::new();
    let mut runs = 0;

    let result: ds3_backup::Result<u64> = run_schedule(Duration::from_millis(1), &token, || {
        runs += 1;
        Err::<(), _>(Error::UserResolutionFailed)
    });

    assert!(matches!(result, Err(Error::UserResolutionFailed)));
    assert_eq!(runs, 1);
}

#[test]
fn test_non_fatal_error_keeps_schedule_running() {
    let token = CancellationToken::new();
    let mut runs = 0;

    let total = run_schedule(Duration::from_millis(1), &token, || {
        runs += 1;
        if runs == 2 {
            token.cancel();
        }
        Err::<(), _>(Error::Io(std::io::Error::other("disk busy")))
    })
    .unwrap();

    assert_eq!(total, 2);
}

#[test]
fn test_scheduled_snapshots_land_in_destination() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_example_fixture(temp_dir.path()).unwrap();
    let out = temp_dir.path().join("auto");
    let opts = options(&source, &out, SnapshotFormat::Archive);
    let token = CancellationToken::new();

    let total = run_schedule(Duration::from_millis(1), &token, || {
        let result = run_snapshot(&opts)?;
        token.cancel();
        Ok(result)
    })
    .unwrap();

    assert_eq!(total, 1);
    let names: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".zip"));
}
