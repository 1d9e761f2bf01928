//! The `quizbank extract` command.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use quizbank_core::bank::{default_export_name, save_bank};
use quizbank_core::traits::{extract_document, TextExtractor};
use quizbank_core::{extract_with_diagnostics, Extraction};
use quizbank_extract::config::load_config_from;
use quizbank_extract::{create_extractor, read_document};

/// Outcome of extracting one input file.
struct FileOutcome {
    input: PathBuf,
    output: PathBuf,
    result: Result<Extraction>,
}

pub async fn execute(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    parallelism: usize,
    strict: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(!inputs.is_empty(), "at least one --input is required");

    let extractor: Option<Arc<dyn TextExtractor>> = if inputs.iter().any(|p| is_pdf(p)) {
        let config = load_config_from(config_path.as_deref())?;
        tracing::info!(endpoint = %config.extractor.endpoint, "using text extraction service");
        Some(Arc::from(create_extractor(&config.extractor)?))
    } else {
        None
    };

    let targets = output_paths(&inputs, output.as_deref());
    eprintln!("Extracting {} file(s)", inputs.len());

    let semaphore = Arc::new(Semaphore::new(parallelism));
    let mut futures = FuturesUnordered::new();

    for (input, target) in inputs.into_iter().zip(targets) {
        let semaphore = Arc::clone(&semaphore);
        let extractor = extractor.clone();
        futures.push(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .context("extraction pool closed")?;
            let result = extract_file(&input, extractor.as_deref()).await;
            anyhow::Ok(FileOutcome {
                input,
                output: target,
                result,
            })
        });
    }

    let mut outcomes = Vec::new();
    while let Some(outcome) = futures.next().await {
        outcomes.push(outcome?);
    }
    outcomes.sort_by(|a, b| a.input.cmp(&b.input));

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(extraction) => {
                save_bank(&extraction.bank, &outcome.output).with_context(|| {
                    format!("failed to write bank: {}", outcome.output.display())
                })?;
                eprintln!(
                    "  {} -> {}",
                    outcome.input.display(),
                    outcome.output.display()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("  ERROR: {}: {e:#}", outcome.input.display());
            }
        }
    }

    print_summary(&outcomes);

    if strict {
        print_diagnostics(&outcomes);
    }

    anyhow::ensure!(failed == 0, "{failed} file(s) failed to extract");
    Ok(())
}

async fn extract_file(path: &Path, extractor: Option<&dyn TextExtractor>) -> Result<Extraction> {
    match extractor.filter(|_| is_pdf(path)) {
        Some(extractor) => {
            let request = read_document(path).await?;
            extract_document(extractor, &request).await
        }
        None => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(extract_with_diagnostics(&text))
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// A single input goes to `--output` (or today's default name); several
/// inputs go to `<dir>/<stem>.json`. Inputs sharing a stem keep their
/// extension (`exam.txt.json`), and any name still taken gets a `-N` suffix.
fn output_paths(inputs: &[PathBuf], output: Option<&Path>) -> Vec<PathBuf> {
    if let [_] = inputs {
        let path = output.map(Path::to_path_buf).unwrap_or_else(|| {
            PathBuf::from(default_export_name(chrono::Local::now().date_naive()))
        });
        return vec![path];
    }

    let dir = output.unwrap_or_else(|| Path::new("."));
    let stems: Vec<&str> = inputs
        .iter()
        .map(|input| {
            input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("questions")
        })
        .collect();

    let mut taken = HashSet::new();
    let mut paths = Vec::with_capacity(inputs.len());
    for (input, &stem) in inputs.iter().zip(&stems) {
        let base = if stems.iter().filter(|&&s| s == stem).count() > 1 {
            input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(stem)
        } else {
            stem
        };

        let mut name = format!("{base}.json");
        let mut suffix = 2;
        while !taken.insert(name.clone()) {
            name = format!("{base}-{suffix}.json");
            suffix += 1;
        }
        paths.push(dir.join(name));
    }
    paths
}

fn print_summary(outcomes: &[FileOutcome]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["File", "Questions", "Degenerate", "Diagnostics"]);

    for outcome in outcomes {
        let name = outcome.input.display().to_string();
        match &outcome.result {
            Ok(extraction) => {
                let degenerate = extraction
                    .bank
                    .iter()
                    .filter(|(_, q)| q.is_degenerate())
                    .count();
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(extraction.bank.len()),
                    Cell::new(degenerate),
                    Cell::new(extraction.diagnostics.len()),
                ]);
            }
            Err(_) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new("FAIL"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    eprintln!("\n{table}");
}

fn print_diagnostics(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        let Ok(extraction) = &outcome.result else {
            continue;
        };
        if extraction.diagnostics.is_empty() {
            continue;
        }
        println!("{}:", outcome.input.display());
        for d in &extraction.diagnostics {
            let prefix = d
                .question_number
                .map(|n| format!("  [Q{n}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} {}: {}", d.kind, d.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_input_uses_output_flag() {
        let paths = output_paths(&[PathBuf::from("exam.txt")], Some(Path::new("bank.json")));
        assert_eq!(paths, vec![PathBuf::from("bank.json")]);
    }

    #[test]
    fn single_input_defaults_to_dated_name() {
        let paths = output_paths(&[PathBuf::from("exam.txt")], None);
        let name = paths[0].to_string_lossy().to_string();
        assert!(name.starts_with("questions_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn several_inputs_go_into_directory() {
        let inputs = vec![PathBuf::from("a/first.pdf"), PathBuf::from("second.txt")];
        let paths = output_paths(&inputs, Some(Path::new("out")));
        assert_eq!(
            paths,
            vec![PathBuf::from("out/first.json"), PathBuf::from("out/second.json")]
        );
    }

    #[test]
    fn shared_stems_get_distinct_outputs() {
        let inputs = vec![
            PathBuf::from("day1/exam.txt"),
            PathBuf::from("day2/exam.pdf"),
            PathBuf::from("other.txt"),
        ];
        let paths = output_paths(&inputs, Some(Path::new("out")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/exam.txt.json"),
                PathBuf::from("out/exam.pdf.json"),
                PathBuf::from("out/other.json"),
            ]
        );
    }

    #[test]
    fn identical_file_names_get_numbered() {
        let inputs = vec![PathBuf::from("day1/exam.txt"), PathBuf::from("day2/exam.txt")];
        let paths = output_paths(&inputs, Some(Path::new("out")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/exam.txt.json"),
                PathBuf::from("out/exam.txt-2.json"),
            ]
        );
    }

    #[test]
    fn pdf_detection_ignores_case() {
        assert!(is_pdf(Path::new("exam.PDF")));
        assert!(is_pdf(Path::new("dir/exam.pdf")));
        assert!(!is_pdf(Path::new("exam.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
