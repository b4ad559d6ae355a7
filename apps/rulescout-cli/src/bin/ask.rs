use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use rulescout_core::config::AppConfig;
use rulescout_embed::embedder_from_config;
use rulescout_engine::{DocumentSource, QueryOptions, RulesEngine};
use rulescout_text::naming::guess_title;
use rulescout_text::pdf::PdfExtractor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: rulescout-ask <query> --dir <pdf_dir> [--game ID]... [--loose] [--no-advisory]");
        eprintln!("Example: rulescout-ask 'When can I build a station?' --dir ./rulebooks --loose");
        std::process::exit(1);
    }

    let mut query = None;
    let mut data_dir = None;
    let mut options = QueryOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" => {
                if i + 1 < args.len() {
                    data_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --dir requires a path");
                    std::process::exit(1);
                }
            }
            "--game" => {
                if i + 1 < args.len() {
                    options.game_filter.push(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --game requires a game id");
                    std::process::exit(1);
                }
            }
            "--loose" => options.strict = false,
            "--no-advisory" => options.allow_interpretation = false,
            _ if !args[i].starts_with('-') => query = Some(args[i].clone()),
            other => {
                eprintln!("Unknown flag: {other}");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    let Some(query) = query else {
        eprintln!("Error: a query is required");
        std::process::exit(1);
    };
    let Some(data_dir) = data_dir else {
        eprintln!("Error: --dir is required (the index is in-memory and rebuilt per run)");
        std::process::exit(1);
    };

    let config = AppConfig::load()?;
    let engine = RulesEngine::new(
        embedder_from_config(&config.embedding),
        Arc::new(PdfExtractor::new()),
        config.chunking,
        config.retrieval,
    );

    let sources = read_sources(&data_dir)?;
    let report = engine.run_ingest(sources, true).await;
    println!(
        "Indexed {} document(s), {} chunk(s); {} skipped, {} failed",
        report.indexed,
        engine.indexed_chunks(),
        report.skipped,
        report.failures.len()
    );

    let answer = engine.retrieve_and_answer(&query, &options).await?;
    println!("\n{}", answer.answer);
    if !answer.citations.is_empty() {
        println!("\nCitations:");
        for citation in &answer.citations {
            println!("  [{} p.{}] {}", citation.game_id, citation.page, citation.snippet);
        }
    }
    Ok(())
}

fn read_sources(root: &Path) -> anyhow::Result<Vec<DocumentSource>> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let (game_id, title) = guess_title(&file_name);
        sources.push(DocumentSource { game_id, title, bytes: fs::read(&path)? });
    }
    Ok(sources)
}
