use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value as JsonValue;
use stardew_core::core_api::{Catalog, CoreError};
use stardew_core::service::{ServiceConfig, TrackerService};
use stardew_core::store::SnapshotStore;
use stardew_core::upload::UploadedFile;
use stardew_render::{
    render_analysis_json, render_analysis_text, render_error, render_health_json,
    render_history_json, render_history_text,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(
        value_name = "SAVE",
        required_unless_present_any = ["history", "health"],
        conflicts_with_all = ["history", "health"]
    )]
    path: Option<PathBuf>,
    #[arg(long, value_name = "CookingRecipes.json", env = "STARDEW_TRACKER_RECIPES")]
    recipes: Option<PathBuf>,
    #[arg(long, value_name = "Fish.json", env = "STARDEW_TRACKER_FISH")]
    fish: Option<PathBuf>,
    #[arg(long, value_name = "PATH", env = "STARDEW_TRACKER_DB")]
    db: Option<PathBuf>,
    #[arg(long = "upload-dir", value_name = "DIR", env = "STARDEW_TRACKER_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(long, conflicts_with = "health")]
    history: bool,
    #[arg(long)]
    health: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn print_json(value: &JsonValue) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing JSON output: {e}");
            process::exit(1);
        }
    }
}

fn fail(context: &str, err: &CoreError, json: bool) -> ! {
    if json {
        let (status, body) = render_error(err);
        debug!(status, "request failed");
        print_json(&body);
    }
    eprintln!("{context}: {}", err.message);
    process::exit(1);
}

fn open_store(db: Option<&Path>, json: bool) -> SnapshotStore {
    let opened = match db {
        Some(path) => SnapshotStore::open(path),
        None => SnapshotStore::open_in_memory(),
    };
    opened.unwrap_or_else(|e| fail("Error opening snapshot database", &e, json))
}

fn load_catalog(cli: &Cli) -> Catalog {
    let (Some(recipes), Some(fish)) = (cli.recipes.as_deref(), cli.fish.as_deref()) else {
        eprintln!("--recipes <PATH> and --fish <PATH> are required (or set STARDEW_TRACKER_RECIPES and STARDEW_TRACKER_FISH)");
        process::exit(2);
    };
    Catalog::load_from_paths(recipes, fish)
        .unwrap_or_else(|e| fail("Error loading catalog", &e, cli.json))
}

fn build_service(cli: &Cli) -> TrackerService {
    let catalog = load_catalog(cli);
    let store = open_store(cli.db.as_deref(), cli.json);
    let mut config = ServiceConfig::default();
    if let Some(dir) = &cli.upload_dir {
        config.upload_dir = dir.clone();
    }
    TrackerService::new(Arc::new(catalog), store, config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.health {
        let service = build_service(&cli);
        print_json(&render_health_json(&service.health()));
        return;
    }

    if cli.history {
        let store = open_store(cli.db.as_deref(), cli.json);
        let history = store
            .list_snapshots()
            .unwrap_or_else(|e| fail("Error reading snapshot history", &e, cli.json));
        if cli.json {
            print_json(&render_history_json(&history));
        } else {
            print!("{}", render_history_text(&history));
        }
        return;
    }

    let Some(path) = cli.path.as_deref() else {
        eprintln!("a SAVE path is required");
        process::exit(2);
    };
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let service = build_service(&cli);
    let upload = UploadedFile::new(filename, bytes);
    let response = service
        .analyze_upload(Some(&upload))
        .unwrap_or_else(|e| fail(&format!("Error analyzing {}", path.display()), &e, cli.json));
    debug!(snapshot_id = response.snapshot_id, "analysis recorded");

    if cli.json {
        print_json(&render_analysis_json(&response));
    } else {
        print!("{}", render_analysis_text(&response));
    }
}
