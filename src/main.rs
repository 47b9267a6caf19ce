use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use javascout::{
    platform_strategy, DiscoveryOptions, DiscoveryStrategy, KeywordSet, DEFAULT_MAX_DEPTH,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,javascout=debug")),
        )
        .init();

    let mut options = DiscoveryOptions::default();
    let mut keywords_file: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--full" => options.full_search = true,
            "--max-depth" => {
                options.max_depth = args
                    .next()
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(DEFAULT_MAX_DEPTH);
            }
            "--keywords" => keywords_file = args.next().map(PathBuf::from),
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: javascout [--full] [--max-depth N] [--keywords FILE]");
                std::process::exit(2);
            }
        }
    }

    let strategy = platform_strategy(load_keywords(keywords_file));
    let entries = strategy.discover(options).await;

    tracing::info!("discovered {} candidate runtime directories", entries.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&entries).expect("entries serialize to JSON")
    );
}

/// Explicit `--keywords` file first, then the user config directory, then
/// the embedded defaults. A broken or empty file degrades to the defaults
/// with a warning instead of aborting the run.
fn load_keywords(explicit: Option<PathBuf>) -> KeywordSet {
    let candidate = explicit.or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("javascout").join("keywords.json"))
            .filter(|path| path.exists())
    });
    let Some(path) = candidate else {
        return KeywordSet::default();
    };

    match KeywordSet::from_file(&path) {
        Ok(keywords) if !keywords.is_empty() => keywords,
        Ok(_) => {
            tracing::warn!("keyword file {:?} has no usable tokens, using defaults", path);
            KeywordSet::default()
        }
        Err(err) => {
            tracing::warn!("cannot load keyword file {:?} ({}), using defaults", path, err);
            KeywordSet::default()
        }
    }
}
