use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use rulescout_core::config::AppConfig;
use rulescout_embed::embedder_from_config;
use rulescout_engine::{DocumentSource, RulesEngine};
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

    let config = AppConfig::load()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None;
    let mut reset = true;
    for arg in &args {
        match arg.as_str() {
            "--keep" | "-k" => reset = false,
            _ if !arg.starts_with('-') => data_dir = Some(PathBuf::from(arg)),
            other => {
                eprintln!("Unknown flag: {other}");
                eprintln!("Usage: rulescout-ingest <pdf_dir> [--keep]");
                std::process::exit(1);
            }
        }
    }
    let Some(data_dir) = data_dir else {
        eprintln!("Usage: rulescout-ingest <pdf_dir> [--keep]");
        std::process::exit(1);
    };

    println!("rulescout ingest\n================");
    println!("PDF directory: {}", data_dir.display());
    if !reset {
        println!("Keeping the existing index (--keep)");
    }

    let files = collect_pdfs(&data_dir);
    if files.is_empty() {
        println!("No .pdf files found under {}.", data_dir.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("#>-"),
    );

    let mut sources = Vec::with_capacity(files.len());
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(file_name.clone());
        let (game_id, title) = guess_title(&file_name);
        sources.push(DocumentSource {
            game_id,
            title,
            bytes: fs::read(path)?,
        });
        pb.inc(1);
    }
    pb.finish_with_message("read");

    let engine = RulesEngine::new(
        embedder_from_config(&config.embedding),
        Arc::new(PdfExtractor::new()),
        config.chunking,
        config.retrieval,
    );
    let report = engine.run_ingest(sources, reset).await;

    println!(
        "\nIndexed {} documents ({} chunks), skipped {}, failed {}",
        report.indexed,
        engine.indexed_chunks(),
        report.skipped,
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  failed: {} ({})", failure.title, failure.error);
    }
    println!("\nGames:");
    for game in engine.list_games() {
        println!("  {} [{}] {} file(s)", game.title, game.id, game.file_count);
    }
    Ok(())
}

fn collect_pdfs(root: &Path) -> Vec<PathBuf> {
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
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_only_pdfs_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("expansions");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b-game.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("a-game.PDF"), b"%PDF").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not a rulebook").unwrap();
        fs::write(nested.join("c-game.pdf"), b"%PDF").unwrap();

        let files = collect_pdfs(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a-game.PDF", "b-game.pdf", "c-game.pdf"]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        assert!(collect_pdfs(Path::new("/nonexistent/rulebooks")).is_empty());
    }
}
