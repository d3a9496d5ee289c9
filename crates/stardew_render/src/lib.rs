use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue, json};
use stardew_core::core_api::{
    AnalysisResponse, CoreError, CoreErrorCode, FishProgress, HealthStatus, ProgressDiff,
    ProgressReport, RecipeProgress, SnapshotSummary,
};

const NEED_TO_LEARN_MARKER: &str = "**NEED TO LEARN";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

pub fn render_analysis_json(response: &AnalysisResponse) -> JsonValue {
    render_report_json(&response.report, response.progress_since.as_ref())
}

/// `{recipes, fish, progressSince}` with a fixed key order. Nested objects
/// come from the core types' serde derives, so field names live in one place.
pub fn render_report_json(
    report: &ProgressReport,
    progress_since: Option<&ProgressDiff>,
) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "recipes".to_string(),
        serde_json::to_value(&report.recipes).expect("recipe progress serializes to JSON"),
    );
    out.insert(
        "fish".to_string(),
        serde_json::to_value(&report.fish).expect("fish progress serializes to JSON"),
    );
    out.insert(
        "progressSince".to_string(),
        serde_json::to_value(progress_since).expect("progress diff serializes to JSON"),
    );
    JsonValue::Object(out)
}

pub fn render_health_json(health: &HealthStatus) -> JsonValue {
    serde_json::to_value(health).expect("health status serializes to JSON")
}

pub fn error_status(code: CoreErrorCode) -> u16 {
    match code {
        CoreErrorCode::InvalidUpload => STATUS_BAD_REQUEST,
        CoreErrorCode::Io
        | CoreErrorCode::CatalogLoad
        | CoreErrorCode::SaveParse
        | CoreErrorCode::Analysis
        | CoreErrorCode::Persistence => STATUS_INTERNAL_ERROR,
    }
}

pub fn error_code_name(code: CoreErrorCode) -> &'static str {
    match code {
        CoreErrorCode::Io => "io",
        CoreErrorCode::CatalogLoad => "catalog_load",
        CoreErrorCode::SaveParse => "save_parse",
        CoreErrorCode::Analysis => "analysis",
        CoreErrorCode::InvalidUpload => "invalid_upload",
        CoreErrorCode::Persistence => "persistence",
    }
}

/// Status code and `{error, code}` body for a failed request.
pub fn render_error(err: &CoreError) -> (u16, JsonValue) {
    let message = match err.code {
        CoreErrorCode::InvalidUpload => err.message.clone(),
        _ => format!("Failed to analyze save file: {}", err.message),
    };
    (
        error_status(err.code),
        json!({ "error": message, "code": error_code_name(err.code) }),
    )
}

pub fn render_history_json(history: &[SnapshotSummary]) -> JsonValue {
    serde_json::to_value(history).expect("snapshot history serializes to JSON")
}

pub fn render_text_report(
    report: &ProgressReport,
    progress_since: Option<&ProgressDiff>,
) -> String {
    let mut out = String::new();
    write_recipe_section(&mut out, &report.recipes);
    out.push('\n');
    write_fish_section(&mut out, &report.fish);
    out.push('\n');
    write_progress_section(&mut out, progress_since);
    out
}

pub fn render_analysis_text(response: &AnalysisResponse) -> String {
    render_text_report(&response.report, response.progress_since.as_ref())
}

fn write_recipe_section(out: &mut String, recipes: &RecipeProgress) {
    writeln!(out, "==== Recipes ====").expect("writing to String cannot fail");
    writeln!(out, "Total recipes in game: {}", recipes.total)
        .expect("writing to String cannot fail");
    writeln!(out, "Learned: {}", recipes.learned).expect("writing to String cannot fail");
    writeln!(out, "Cooked: {}", recipes.cooked).expect("writing to String cannot fail");
    writeln!(out, "Need to learn: {}", recipes.missing_to_learn)
        .expect("writing to String cannot fail");
    writeln!(out, "Need to cook: {}", recipes.missing_to_cook)
        .expect("writing to String cannot fail");

    if !recipes.missing_list.is_empty() {
        writeln!(out).expect("writing to String cannot fail");
        writeln!(out, "=== Ingredients ===").expect("writing to String cannot fail");
        for recipe in &recipes.missing_list {
            let ingredients = recipe
                .ingredients
                .iter()
                .map(|i| format!("{} x{}", i.name, i.quantity))
                .collect::<Vec<_>>()
                .join(", ");
            if recipe.need_to_learn {
                writeln!(out, "{}: {} {}", recipe.name, ingredients, NEED_TO_LEARN_MARKER)
                    .expect("writing to String cannot fail");
            } else {
                writeln!(out, "{}: {}", recipe.name, ingredients)
                    .expect("writing to String cannot fail");
            }
        }
    }

    if !recipes.unrecognized_cooked.is_empty() {
        writeln!(out).expect("writing to String cannot fail");
        writeln!(
            out,
            "Unrecognized cooked entries: {}",
            recipes.unrecognized_cooked.join(", ")
        )
        .expect("writing to String cannot fail");
    }
}

fn write_fish_section(out: &mut String, fish: &FishProgress) {
    writeln!(out, "==== Fish ====").expect("writing to String cannot fail");
    writeln!(out, "Total species in game: {}", fish.total)
        .expect("writing to String cannot fail");
    writeln!(out, "Distinct species caught: {}", fish.caught)
        .expect("writing to String cannot fail");
    writeln!(out, "Total fish caught: {}", fish.total_caught)
        .expect("writing to String cannot fail");
    writeln!(out, "Uncaught species: {}", fish.uncaught).expect("writing to String cannot fail");

    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, "=== CAUGHT ===").expect("writing to String cannot fail");
    for entry in &fish.caught_list {
        writeln!(out, "{}", entry.name).expect("writing to String cannot fail");
    }

    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, "=== UNCAUGHT ===").expect("writing to String cannot fail");
    for entry in &fish.missing_list {
        writeln!(out, "{}", entry.name).expect("writing to String cannot fail");
    }
}

fn write_progress_section(out: &mut String, progress_since: Option<&ProgressDiff>) {
    writeln!(out, "==== Since last upload ====").expect("writing to String cannot fail");
    let Some(diff) = progress_since else {
        writeln!(out, "First upload: nothing to compare against yet.")
            .expect("writing to String cannot fail");
        return;
    };

    writeln!(
        out,
        "Compared with snapshot #{} ({})",
        diff.previous_snapshot_id,
        diff.previous_uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("writing to String cannot fail");
    if diff.is_empty() {
        writeln!(out, "No new fish or recipes.").expect("writing to String cannot fail");
        return;
    }
    for entry in &diff.newly_caught_fish {
        writeln!(out, "Newly caught: {}", entry.name).expect("writing to String cannot fail");
    }
    for name in &diff.newly_cooked_recipes {
        writeln!(out, "Newly cooked: {name}").expect("writing to String cannot fail");
    }
}

pub fn render_history_text(history: &[SnapshotSummary]) -> String {
    if history.is_empty() {
        return "No snapshots recorded.\n".to_string();
    }
    let mut out = String::new();
    writeln!(
        &mut out,
        "{:<6}{:<22}{:>8}{:>10}{:>9}",
        "ID", "UPLOADED", "FISH", "LEARNED", "COOKED"
    )
    .expect("writing to String cannot fail");
    for summary in history {
        writeln!(
            &mut out,
            "{:<6}{:<22}{:>8}{:>10}{:>9}",
            summary.id,
            summary.uploaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            summary.fish_caught,
            summary.recipes_learned,
            summary.recipes_cooked
        )
        .expect("writing to String cannot fail");
    }
    out
}
