use std::path::PathBuf;
use std::sync::Arc;

use stardew_core::core_api::{
    AnalysisResponse, Catalog, CoreError, CoreErrorCode, Engine, FishEntry, FishProgress,
    ProgressDiff, ProgressReport, RecipeProgress,
};
use stardew_core::service::{ServiceConfig, TrackerService};
use stardew_core::store::SnapshotStore;
use stardew_render::{
    error_status, render_analysis_json, render_error, render_health_json, render_history_json,
    render_history_text, render_report_json, render_text_report,
};
use serde_json::Value;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn fixture_catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::load_from_paths(
            &fixture_path("CookingRecipes.json"),
            &fixture_path("Fish.json"),
        )
        .expect("fixture catalog should load"),
    )
}

fn report_for(save: &str) -> ProgressReport {
    let bytes = std::fs::read(fixture_path(save)).expect("fixture should be readable");
    Engine::new(fixture_catalog())
        .open_bytes(bytes)
        .expect("fixture should parse")
        .into_report()
}

fn service() -> TrackerService {
    let upload_dir = tempfile::tempdir().expect("temp dir");
    TrackerService::new(
        fixture_catalog(),
        SnapshotStore::open_in_memory().expect("in-memory store"),
        ServiceConfig {
            upload_dir: upload_dir.keep(),
            ..ServiceConfig::default()
        },
    )
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn report_json_uses_canonical_top_level_order() {
    let value = render_report_json(&report_for("save_day1.xml"), None);
    assert_eq!(keys(&value), vec!["recipes", "fish", "progressSince"]);
    assert!(value["progressSince"].is_null());
}

#[test]
fn recipe_and_fish_sections_use_camel_case_keys() {
    let value = render_report_json(&report_for("save_day1.xml"), None);
    assert_eq!(
        keys(&value["recipes"]),
        vec![
            "total",
            "learned",
            "cooked",
            "missingToLearn",
            "missingToCook",
            "missingList",
            "cookedList",
            "learnedList",
            "missingToLearnList",
            "unrecognizedLearned",
            "unrecognizedCooked",
        ]
    );
    assert_eq!(
        keys(&value["fish"]),
        vec![
            "total",
            "caught",
            "uncaught",
            "totalCaught",
            "missingList",
            "caughtList"
        ]
    );
}

#[test]
fn report_json_carries_day_one_counts() {
    let value = render_report_json(&report_for("save_day1.xml"), None);
    assert_eq!(value["recipes"]["total"], 6);
    assert_eq!(value["recipes"]["learned"], 3);
    assert_eq!(value["recipes"]["cooked"], 1);
    assert_eq!(value["recipes"]["missingToLearn"], 3);
    assert_eq!(value["recipes"]["missingToCook"], 5);
    assert_eq!(value["recipes"]["cookedList"][0]["name"], "Fried Egg");
    assert_eq!(value["fish"]["caught"], 2);
    assert_eq!(value["fish"]["totalCaught"], 4);

    let missing = value["recipes"]["missingList"]
        .as_array()
        .expect("missingList should be an array");
    let cheese = missing
        .iter()
        .find(|entry| entry["name"] == "Cheese Cauli.")
        .expect("Cheese Cauli. should be missing");
    assert_eq!(cheese["needToLearn"], true);
    assert_eq!(cheese["ingredients"][0]["name"], "Cauliflower");
    assert_eq!(cheese["ingredients"][1]["name"], "Cheese");
    assert_eq!(cheese["ingredients"][1]["quantity"], 1);
}

#[test]
fn progress_since_is_rendered_when_present() {
    let service = service();
    let day1 = std::fs::read(fixture_path("save_day1.xml")).expect("day1 fixture");
    let day2 = std::fs::read(fixture_path("save_day2.xml")).expect("day2 fixture");
    service.analyze_bytes(day1).expect("day1 should analyze");
    let response: AnalysisResponse = service.analyze_bytes(day2).expect("day2 should analyze");

    let value = render_analysis_json(&response);
    let since = &value["progressSince"];
    assert_eq!(
        keys(since),
        vec![
            "previousSnapshotId",
            "previousUploadedAt",
            "newlyCaughtFish",
            "newlyCookedRecipes"
        ]
    );
    assert_eq!(since["newlyCaughtFish"][0]["name"], "Pufferfish");
    assert_eq!(since["newlyCookedRecipes"][0], "Moss Soup");
    assert_eq!(since["newlyCookedRecipes"][1], "Omelet");
}

#[test]
fn text_report_marks_recipes_that_still_need_learning() {
    let text = render_text_report(&report_for("save_day1.xml"), None);
    assert!(text.contains("Total recipes in game: 6"));
    assert!(text.contains("Cheese Cauli.: Cauliflower x1, Cheese x1 **NEED TO LEARN"));
    assert!(text.contains("Mystery Dish: Unknown (999) x2 **NEED TO LEARN"));
    assert!(text.contains("Omelet: Any Egg x1, Any Milk x1\n"));
    assert!(text.contains("=== CAUGHT ===\nCarp\nSunfish\n"));
    assert!(text.contains("First upload"));
}

#[test]
fn text_report_lists_new_progress() {
    let diff = ProgressDiff {
        previous_snapshot_id: 4,
        previous_uploaded_at: chrono_epoch(),
        newly_caught_fish: vec![FishEntry {
            id: "128".to_string(),
            name: "Pufferfish".to_string(),
        }],
        newly_cooked_recipes: vec!["Omelet".to_string()],
    };
    let text = render_text_report(&report_for("save_day2.xml"), Some(&diff));
    assert!(text.contains("Compared with snapshot #4"));
    assert!(text.contains("Newly caught: Pufferfish"));
    assert!(text.contains("Newly cooked: Omelet"));
}

fn chrono_epoch() -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(0, 0).expect("epoch is representable")
}

#[test]
fn invalid_uploads_map_to_bad_request() {
    let err = CoreError::new(CoreErrorCode::InvalidUpload, "No file selected");
    let (status, body) = render_error(&err);
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No file selected");
    assert_eq!(body["code"], "invalid_upload");
}

#[test]
fn processing_failures_map_to_internal_error() {
    let err = CoreError::new(CoreErrorCode::SaveParse, "unexpected end of stream");
    let (status, body) = render_error(&err);
    assert_eq!(status, 500);
    assert_eq!(
        body["error"],
        "Failed to analyze save file: unexpected end of stream"
    );
    assert_eq!(body["code"], "save_parse");
}

#[test]
fn health_renders_ok_status() {
    let value = render_health_json(&service().health());
    assert_eq!(value, serde_json::json!({ "status": "ok" }));
}

#[test]
fn history_renders_one_row_per_snapshot() {
    let service = service();
    let day1 = std::fs::read(fixture_path("save_day1.xml")).expect("day1 fixture");
    service.analyze_bytes(day1).expect("day1 should analyze");
    let history = service.store().list_snapshots().expect("history");

    let value = render_history_json(&history);
    let rows = value.as_array().expect("history should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["fishCaught"], 2);
    assert_eq!(rows[0]["recipesLearned"], 3);
    assert_eq!(rows[0]["recipesCooked"], 1);

    let text = render_history_text(&history);
    assert_eq!(text.lines().count(), 2);
    assert!(render_history_text(&[]).contains("No snapshots recorded."));
}

#[test]
fn report_sections_read_back_into_core_types() {
    let report = report_for("save_day2.xml");
    let value = render_report_json(&report, None);

    let recipes: RecipeProgress =
        serde_json::from_value(value["recipes"].clone()).expect("recipes should deserialize");
    let fish: FishProgress =
        serde_json::from_value(value["fish"].clone()).expect("fish should deserialize");
    assert_eq!(recipes, report.recipes);
    assert_eq!(fish, report.fish);
}

#[test]
fn inconsistent_reports_map_to_internal_error() {
    assert_eq!(error_status(CoreErrorCode::Analysis), 500);
    let err = CoreError::new(CoreErrorCode::Analysis, "recipe summary is inconsistent");
    let (status, body) = render_error(&err);
    assert_eq!(status, 500);
    assert_eq!(body["code"], "analysis");
}
