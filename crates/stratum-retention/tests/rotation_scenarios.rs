//! End-to-end rotation scenarios over a real directory tree
#![cfg(unix)]

use chrono::{Days, NaiveDate, Weekday};
use std::fs;
use std::path::{Path, PathBuf};
use stratum_domain::{ArtifactProducer, Horizon, KeepCounts};
use stratum_retention::{
    entry_kind, EntryKind, ErrorKind, ProjectConfig, ProjectLayout, ProjectOutcome, PurgeAction,
    Purger, RetentionConfig, Rotator,
};
use tempfile::TempDir;

struct DumpProducer;

impl ArtifactProducer for DumpProducer {
    type Error = std::io::Error;

    fn produce(&mut self, project: &str, target: &Path) -> Result<(), Self::Error> {
        fs::write(target, format!("dump of {}", project))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn project(name: &str, keep: KeepCounts) -> ProjectConfig {
    ProjectConfig {
        name: name.to_string(),
        enabled: true,
        extension: "sql.gz".to_string(),
        interval: keep,
    }
}

fn rotator(dir: &TempDir, projects: Vec<ProjectConfig>) -> Rotator {
    Rotator::new(RetentionConfig {
        folder: dir.path().to_path_buf(),
        weekly_day: Weekday::Mon,
        projects,
    })
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

fn real_files(layout: &ProjectLayout) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for horizon in Horizon::SLOWEST_FIRST {
        let dir = layout.horizon_dir(horizon);
        for name in entries(&dir) {
            let path = dir.join(name);
            if entry_kind(&path).unwrap() == Some(EntryKind::Real) {
                found.push(path);
            }
        }
    }
    found
}

/// Every link in the tree resolves to a real file in a slower horizon
fn assert_links_resolve(layout: &ProjectLayout) {
    for horizon in Horizon::SLOWEST_FIRST {
        let dir = layout.horizon_dir(horizon);
        for name in entries(&dir) {
            let path = dir.join(&name);
            if entry_kind(&path).unwrap() == Some(EntryKind::Link) {
                let target = fs::read_link(&path).unwrap();
                assert!(target.is_relative(), "{} is absolute", target.display());
                assert!(path.is_file(), "{} dangles", path.display());
            }
        }
    }
}

#[test]
fn test_daily_only_keeps_last_three() {
    let dir = TempDir::new().unwrap();
    let db = project("db", KeepCounts::new(3, 0, 0));
    let mut rotator = rotator(&dir, vec![db.clone()]);

    let start = date(2024, 3, 4);
    for offset in 0..5 {
        let today = start.checked_add_days(Days::new(offset)).unwrap();
        rotator.rotate_project(&db, &mut DumpProducer, today).unwrap();
    }

    let layout = rotator.layout(&db);
    assert_eq!(
        entries(&layout.horizon_dir(Horizon::Daily)),
        vec!["db_2024-03-06.sql.gz", "db_2024-03-07.sql.gz", "db_2024-03-08.sql.gz"]
    );
    assert_eq!(real_files(&layout).len(), 3);
    assert!(entries(&layout.horizon_dir(Horizon::Weekly)).is_empty());
    assert!(entries(&layout.horizon_dir(Horizon::Monthly)).is_empty());
    assert_eq!(rotator.metrics().total_deleted(), 2);
}

#[test]
fn test_expired_weekly_hands_file_to_daily_link() {
    let dir = TempDir::new().unwrap();
    let keep = KeepCounts::new(1, 1, 0);
    let db = project("db", keep);
    let mut rotator = rotator(&dir, vec![db.clone()]);
    let layout = rotator.layout(&db);

    rotator.rotate_project(&db, &mut DumpProducer, date(2024, 1, 8)).unwrap();
    assert_eq!(
        entry_kind(&layout.entry_path(Horizon::Daily, "db_2024-01-08.sql.gz")).unwrap(),
        Some(EntryKind::Link)
    );

    // Second Monday: place by hand and purge weekly before daily gets a say
    let evaluator = stratum_retention::DueEvaluator::new(Weekday::Mon);
    let file_name = "db_2024-01-15.sql.gz";
    let artifact = layout.root().join(file_name);
    fs::write(&artifact, "dump of db").unwrap();
    let due = evaluator.evaluate(&layout, file_name, &keep, date(2024, 1, 15)).unwrap();
    stratum_retention::place(&artifact, &layout, &due).unwrap();

    let purger = Purger::new(false);
    let weekly = purger.purge_horizon(&layout, Horizon::Weekly, &keep).unwrap();

    let old_daily = layout.entry_path(Horizon::Daily, "db_2024-01-08.sql.gz");
    assert_eq!(
        weekly.actions,
        vec![PurgeAction::Relocated {
            file_name: "db_2024-01-08.sql.gz".to_string(),
            to: Horizon::Daily,
        }]
    );
    assert_eq!(entry_kind(&old_daily).unwrap(), Some(EntryKind::Real));
    assert_eq!(fs::read_to_string(&old_daily).unwrap(), "dump of db");

    let daily = purger.purge_horizon(&layout, Horizon::Daily, &keep).unwrap();
    assert_eq!(daily.deleted(), 1);
    assert!(!old_daily.exists());
    assert_eq!(entries(&layout.horizon_dir(Horizon::Weekly)), vec![file_name]);
    assert_eq!(entries(&layout.horizon_dir(Horizon::Daily)), vec![file_name]);
    assert_eq!(real_files(&layout).len(), 1);
    assert_links_resolve(&layout);
}

#[test]
fn test_long_daily_history_outlives_weekly() {
    let dir = TempDir::new().unwrap();
    let db = project("db", KeepCounts::new(14, 1, 0));
    let mut rotator = rotator(&dir, vec![db.clone()]);
    let layout = rotator.layout(&db);

    let start = date(2024, 1, 8);
    for offset in 0..8 {
        let today = start.checked_add_days(Days::new(offset)).unwrap();
        rotator.rotate_project(&db, &mut DumpProducer, today).unwrap();
    }

    // The first Monday left weekly and now lives on as a real daily entry
    let first = layout.entry_path(Horizon::Daily, "db_2024-01-08.sql.gz");
    assert_eq!(entry_kind(&first).unwrap(), Some(EntryKind::Real));
    assert_eq!(entries(&layout.horizon_dir(Horizon::Weekly)), vec!["db_2024-01-15.sql.gz"]);
    assert_eq!(entries(&layout.horizon_dir(Horizon::Daily)).len(), 8);
    assert_eq!(real_files(&layout).len(), 8);
    assert_eq!(rotator.metrics().total_relocated(), 1);
    assert_links_resolve(&layout);
}

#[test]
fn test_full_history_stays_deduplicated() {
    let dir = TempDir::new().unwrap();
    let db = project("db", KeepCounts::new(7, 4, 3));
    let mut rotator = rotator(&dir, vec![db.clone()]);
    let layout = rotator.layout(&db);

    let start = date(2024, 1, 1);
    for offset in 0..120 {
        let today = start.checked_add_days(Days::new(offset)).unwrap();
        rotator.rotate_project(&db, &mut DumpProducer, today).unwrap();
    }

    assert_eq!(entries(&layout.horizon_dir(Horizon::Daily)).len(), 7);
    assert_eq!(entries(&layout.horizon_dir(Horizon::Weekly)).len(), 4);
    assert_eq!(entries(&layout.horizon_dir(Horizon::Monthly)).len(), 3);

    // Each surviving name exists as exactly one real file
    let real = real_files(&layout);
    let mut names: Vec<_> = real.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), real.len());
    assert_links_resolve(&layout);
}

#[test]
fn test_enabling_horizons_later_keeps_one_real_file() {
    let dir = TempDir::new().unwrap();
    let mut db = project("db", KeepCounts::new(7, 0, 0));
    let mut rotator = rotator(&dir, vec![db.clone()]);
    let layout = rotator.layout(&db);

    rotator.rotate_project(&db, &mut DumpProducer, date(2024, 1, 9)).unwrap();

    // Wednesday, mid-month: weekly and monthly bootstrap from empty history
    db.interval = KeepCounts::new(7, 4, 12);
    let outcome = rotator.rotate_project(&db, &mut DumpProducer, date(2024, 1, 10)).unwrap();

    match outcome {
        ProjectOutcome::Rotated { due, placement, .. } => {
            assert!(due.daily && due.weekly && due.monthly);
            assert_eq!(placement.owner, Horizon::Monthly);
        }
        other => panic!("expected rotation, got {:?}", other),
    }
    let today = "db_2024-01-10.sql.gz";
    assert_eq!(
        entry_kind(&layout.entry_path(Horizon::Monthly, today)).unwrap(),
        Some(EntryKind::Real)
    );
    assert_eq!(
        fs::read_link(layout.entry_path(Horizon::Weekly, today)).unwrap(),
        PathBuf::from("../monthly").join(today)
    );
    assert_eq!(
        fs::read_link(layout.entry_path(Horizon::Daily, today)).unwrap(),
        PathBuf::from("../weekly").join(today)
    );
    assert_links_resolve(&layout);
}

#[test]
fn test_ensure_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let layout = ProjectLayout::new(dir.path().join("db"));

    let first = layout.ensure().unwrap();
    let second = layout.ensure().unwrap();

    assert_eq!(first.created.len(), 4);
    assert!(second.is_noop());
}

#[test]
fn test_real_file_in_faster_horizon_stops_purge() {
    let dir = TempDir::new().unwrap();
    let keep = KeepCounts::new(7, 1, 0);
    let layout = ProjectLayout::new(dir.path().join("db"));
    layout.ensure().unwrap();
    for name in ["db_2024-01-01.sql.gz", "db_2024-01-08.sql.gz"] {
        fs::write(layout.entry_path(Horizon::Weekly, name), "x").unwrap();
    }
    fs::write(layout.entry_path(Horizon::Daily, "db_2024-01-01.sql.gz"), "copy").unwrap();

    let err = Purger::new(false)
        .purge_horizon(&layout, Horizon::Weekly, &keep)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(layout.entry_path(Horizon::Weekly, "db_2024-01-01.sql.gz").exists());
}

#[test]
fn test_failing_project_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    // A file where the project root should be
    fs::write(dir.path().join("blocked"), "not a dir").unwrap();
    let mut rotator = rotator(
        &dir,
        vec![
            project("blocked", KeepCounts::new(7, 0, 0)),
            project("db", KeepCounts::new(7, 0, 0)),
        ],
    );

    let report = rotator.run(&mut DumpProducer, date(2024, 1, 10));

    let failures: Vec<_> = report.failures().map(|(p, e)| (p.to_string(), e.kind())).collect();
    assert_eq!(failures, vec![("blocked".to_string(), ErrorKind::Configuration)]);
    assert!(dir.path().join("db/daily/db_2024-01-10.sql.gz").is_file());
}

#[test]
fn test_partial_placement_names_written_horizons() {
    let dir = TempDir::new().unwrap();
    let layout = ProjectLayout::new(dir.path().join("db"));
    layout.ensure().unwrap();
    let file_name = "db_2024-02-01.sql.gz";
    let artifact = layout.root().join(file_name);
    fs::write(&artifact, "dump of db").unwrap();
    // Something already sits where the daily link has to go
    fs::write(layout.entry_path(Horizon::Daily, file_name), "stray").unwrap();

    let due = stratum_domain::DueSet {
        daily: true,
        weekly: true,
        monthly: true,
    };
    let err = stratum_retention::place(&artifact, &layout, &due).unwrap_err();

    match err {
        stratum_retention::RetentionError::PartialPlacement { placed, .. } => {
            assert_eq!(placed, vec![Horizon::Monthly, Horizon::Weekly]);
        }
        other => panic!("expected partial placement, got {:?}", other),
    }
    assert_eq!(
        entry_kind(&layout.entry_path(Horizon::Monthly, file_name)).unwrap(),
        Some(EntryKind::Real)
    );
    assert!(layout.entry_path(Horizon::Weekly, file_name).is_file());
    assert_eq!(fs::read_to_string(layout.entry_path(Horizon::Daily, file_name)).unwrap(), "stray");
}
