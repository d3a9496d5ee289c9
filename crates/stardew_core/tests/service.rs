use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stardew_core::core_api::{Catalog, CoreErrorCode};
use stardew_core::service::{ServiceConfig, TrackerService};
use stardew_core::store::SnapshotStore;
use stardew_core::upload::{UploadPolicy, UploadedFile};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> Vec<u8> {
    let path = fixture_path(name);
    fs::read(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}

fn service_in(upload_dir: &Path) -> TrackerService {
    let catalog = Catalog::load_from_paths(
        &fixture_path("CookingRecipes.json"),
        &fixture_path("Fish.json"),
    )
    .expect("fixture catalog should load");
    TrackerService::new(
        Arc::new(catalog),
        SnapshotStore::open_in_memory().expect("in-memory store"),
        ServiceConfig {
            upload_dir: upload_dir.to_path_buf(),
            upload_policy: UploadPolicy::default(),
        },
    )
}

fn dir_entries(dir: &Path) -> usize {
    fs::read_dir(dir).expect("upload dir should be readable").count()
}

#[test]
fn health_reports_ok() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(service_in(dir.path()).health().status, "ok");
}

#[test]
fn rejects_missing_and_unnamed_uploads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let err = service.analyze_upload(None).expect_err("no file");
    assert_eq!(err.code, CoreErrorCode::InvalidUpload);
    assert_eq!(err.message, "No file provided");

    let upload = UploadedFile::new("", read_fixture("save_day1.xml"));
    let err = service.analyze_upload(Some(&upload)).expect_err("empty name");
    assert_eq!(err.code, CoreErrorCode::InvalidUpload);
    assert_eq!(err.message, "No file selected");

    assert_eq!(service.store().snapshot_count().expect("count"), 0);
    assert_eq!(dir_entries(dir.path()), 0);
}

#[test]
fn extension_rules() {
    let policy = UploadPolicy::default();
    assert!(policy.is_allowed_filename("Stickle_378934330"));
    assert!(policy.is_allowed_filename("save.xml"));
    assert!(policy.is_allowed_filename("SAVE.XML"));
    assert!(policy.is_allowed_filename("notes.txt"));
    assert!(policy.is_allowed_filename("trailing."));
    assert!(!policy.is_allowed_filename("farm.png"));
    assert!(!policy.is_allowed_filename("archive.xml.zip"));
}

#[test]
fn rejects_disallowed_extension_without_side_effects() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let upload = UploadedFile::new("farm.png", read_fixture("save_day1.xml"));
    let err = service.analyze_upload(Some(&upload)).expect_err("bad extension");
    assert_eq!(err.code, CoreErrorCode::InvalidUpload);
    assert_eq!(service.store().snapshot_count().expect("count"), 0);
    assert_eq!(dir_entries(dir.path()), 0);
}

#[test]
fn rejects_oversized_uploads() {
    let policy = UploadPolicy {
        max_bytes: 8,
        ..UploadPolicy::default()
    };
    let upload = UploadedFile::new("save.xml", vec![b'x'; 9]);
    let err = policy.validate(Some(&upload)).expect_err("too large");
    assert_eq!(err.code, CoreErrorCode::InvalidUpload);
}

#[test]
fn staged_file_is_removed_after_success() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let upload = UploadedFile::new("Stickle_378934330", read_fixture("save_day1.xml"));
    let response = service.analyze_upload(Some(&upload)).expect("analysis should succeed");

    assert!(response.progress_since.is_none());
    assert_eq!(response.report.recipes.cooked, 1);
    assert_eq!(dir_entries(dir.path()), 0);
}

#[test]
fn staged_file_is_removed_after_parse_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let upload = UploadedFile::new("broken.xml", read_fixture("broken.xml"));
    let err = service.analyze_upload(Some(&upload)).expect_err("broken save");
    assert_eq!(err.code, CoreErrorCode::SaveParse);
    assert_eq!(dir_entries(dir.path()), 0);
    assert_eq!(service.store().snapshot_count().expect("count"), 0);
}

#[test]
fn long_filenames_are_staged_and_analyzed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let filename = format!("{}.xml", "a".repeat(250));
    let upload = UploadedFile::new(filename, read_fixture("save_day1.xml"));
    let response = service
        .analyze_upload(Some(&upload))
        .expect("long but valid filename should be accepted");

    assert_eq!(response.report.recipes.cooked, 1);
    assert_eq!(dir_entries(dir.path()), 0);
}

#[test]
fn parse_errors_do_not_reveal_the_upload_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let upload = UploadedFile::new("broken.xml", read_fixture("broken.xml"));
    let err = service.analyze_upload(Some(&upload)).expect_err("broken save");
    let upload_dir = dir.path().to_string_lossy().into_owned();
    assert_eq!(err.code, CoreErrorCode::SaveParse);
    assert!(
        !err.message.contains(&upload_dir),
        "message leaks upload dir: {}",
        err.message
    );
}

#[test]
fn missing_upload_dir_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(&dir.path().join("missing"));

    let upload = UploadedFile::new("save.xml", read_fixture("save_day1.xml"));
    let err = service.analyze_upload(Some(&upload)).expect_err("no upload dir");
    assert_eq!(err.code, CoreErrorCode::Io);
    assert!(!err.message.contains(&*dir.path().to_string_lossy()));
}

#[test]
fn consecutive_uploads_report_progress_since_last_check() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let day1 = UploadedFile::new("day1.xml", read_fixture("save_day1.xml"));
    let first = service.analyze_upload(Some(&day1)).expect("day 1 should analyze");
    assert!(first.progress_since.is_none());

    let day2 = UploadedFile::new("day2.xml", read_fixture("save_day2.xml"));
    let second = service.analyze_upload(Some(&day2)).expect("day 2 should analyze");
    let diff = second.progress_since.expect("day 2 should diff against day 1");

    assert_eq!(diff.previous_snapshot_id, first.snapshot_id);
    let fish: Vec<(&str, &str)> = diff
        .newly_caught_fish
        .iter()
        .map(|f| (f.id.as_str(), f.name.as_str()))
        .collect();
    assert_eq!(fish, vec![("128", "Pufferfish"), ("RiverJelly", "River Jelly")]);
    assert_eq!(
        diff.newly_cooked_recipes,
        vec!["Moss Soup".to_string(), "Omelet".to_string()]
    );
    assert_eq!(
        second.report.recipes.unrecognized_cooked,
        vec!["9999".to_string()]
    );
}

#[test]
fn analyze_bytes_skips_staging() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = service_in(dir.path());

    let response = service
        .analyze_bytes(read_fixture("new_farm.xml"))
        .expect("new farm should analyze");
    assert_eq!(response.report.fish.caught, 0);
    assert_eq!(response.report.recipes.learned, 0);
    assert_eq!(service.store().snapshot_count().expect("count"), 1);
}
