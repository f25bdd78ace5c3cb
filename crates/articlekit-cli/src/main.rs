//! ArticleKit CLI - Command-line interface for converting web articles

use articlekit::{parse_url_list, BatchError, ConvertReport, ConvertRequest, Converter};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Most URLs accepted in one batch
const MAX_URLS: usize = 10;

/// ArticleKit - convert web articles into text and PDF documents
#[derive(Parser, Debug)]
#[command(name = "articlekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert article URLs into documents, zipping multiple results
    Convert {
        /// Article URLs
        urls: Vec<String>,

        /// Output format (txt or pdf)
        #[arg(long, short, default_value = "txt")]
        format: String,

        /// Read URLs from a file, one per line ("-" for stdin)
        #[arg(long, short)]
        input: Option<String>,

        /// Directory to write the result into
        #[arg(long, short, default_value = ".")]
        output: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Print a JSON report instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            urls,
            format,
            input,
            output,
            timeout,
            user_agent,
            json,
        }) => {
            let urls = match collect_urls(urls, input.as_deref()) {
                Ok(urls) => urls,
                Err(e) => {
                    eprintln!("Error reading URLs: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(message) = check_batch_size(&urls) {
                fail(&message, json);
            }

            let mut builder = Converter::builder();
            if let Some(secs) = timeout {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }

            run_convert(&builder.build(), ConvertRequest::new(urls, format), &output, json).await;
        }
        None => {
            eprintln!("Usage: articlekit convert <URL>... --format <txt|pdf>");
            eprintln!("   or: articlekit --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run_convert(converter: &Converter, request: ConvertRequest, output: &Path, json: bool) {
    let conversion = match converter.execute(request).await {
        Ok(conversion) => conversion,
        Err(e) => {
            if json {
                writeln_json(&error_report(&e));
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    };

    let report = conversion.report(None);
    let delivered = match conversion.artifact.deliver_to(output) {
        Ok(path) => path,
        Err(e) => fail(&format!("Failed to save result: {}", e), json),
    };
    let report = ConvertReport {
        artifact: Some(delivered),
        ..report
    };

    if json {
        writeln_json(&report);
    } else {
        writeln_safe(&format_summary(&report));
    }
}

/// Merge positional URLs with URLs read from `input`
fn collect_urls(positional: Vec<String>, input: Option<&str>) -> io::Result<Vec<String>> {
    let mut urls: Vec<String> = positional
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if let Some(source) = input {
        let text = if source == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(source)?
        };
        urls.extend(parse_url_list(&text));
    }

    Ok(urls)
}

fn check_batch_size(urls: &[String]) -> Result<(), String> {
    if urls.is_empty() {
        return Err("No URLs provided".to_string());
    }
    if urls.len() > MAX_URLS {
        return Err(format!(
            "Maximum {} URLs allowed, got {}",
            MAX_URLS,
            urls.len()
        ));
    }
    Ok(())
}

fn error_report(err: &BatchError) -> ConvertReport {
    ConvertReport {
        failures: err.failures().to_vec(),
        error: Some(err.to_string()),
        ..Default::default()
    }
}

/// Format a finished batch for the terminal
fn format_summary(report: &ConvertReport) -> String {
    let mut output = String::new();

    if let Some(ref path) = report.artifact {
        output.push_str(&format!("Saved: {}\n", path.display()));
    }
    output.push_str(&format!("Converted: {}\n", report.converted.len()));
    for title in &report.converted {
        output.push_str(&format!("  - {}\n", title));
    }
    if !report.failures.is_empty() {
        output.push_str(&format!("Failed: {}\n", report.failures.len()));
        for failure in &report.failures {
            output.push_str(&format!("  - {}\n", failure));
        }
    }

    output.trim_end().to_string()
}

fn fail(message: &str, json: bool) -> ! {
    if json {
        writeln_json(&ConvertReport {
            error: Some(message.to_string()),
            ..Default::default()
        });
    } else {
        eprintln!("Error: {}", message);
    }
    std::process::exit(1);
}

fn writeln_json(report: &ConvertReport) {
    let json = serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        eprintln!("Error serializing report: {}", e);
        std::process::exit(1);
    });
    writeln_safe(&json);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "articlekit",
            "convert",
            "https://example.com/a",
            "https://example.com/b",
            "--format",
            "pdf",
            "--output",
            "out",
            "--timeout",
            "5",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Convert {
                urls,
                format,
                output,
                timeout,
                json,
                input,
                user_agent,
            }) => {
                assert_eq!(urls.len(), 2);
                assert_eq!(format, "pdf");
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(timeout, Some(5));
                assert!(json);
                assert!(input.is_none());
                assert!(user_agent.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["articlekit", "convert", "https://example.com"]).unwrap();
        match cli.command {
            Some(Commands::Convert {
                format, output, json, ..
            }) => {
                assert_eq!(format, "txt");
                assert_eq!(output, PathBuf::from("."));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_collect_urls_merges_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("urls.txt");
        std::fs::write(&file, "https://example.com/b\n\n  https://example.com/c  \n").unwrap();

        let urls = collect_urls(
            vec!["https://example.com/a".to_string(), "  ".to_string()],
            Some(file.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }

    #[test]
    fn test_collect_urls_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(collect_urls(vec![], Some(missing.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_batch_size_limits() {
        let urls = |n: usize| -> Vec<String> {
            (0..n).map(|i| format!("https://example.com/{}", i)).collect()
        };
        assert!(check_batch_size(&urls(1)).is_ok());
        assert!(check_batch_size(&urls(MAX_URLS)).is_ok());
        assert_eq!(
            check_batch_size(&urls(11)).unwrap_err(),
            "Maximum 10 URLs allowed, got 11"
        );
        assert_eq!(check_batch_size(&[]).unwrap_err(), "No URLs provided");
    }

    #[test]
    fn test_format_summary() {
        let report = ConvertReport {
            artifact: Some(PathBuf::from("out/articles.zip")),
            content_type: Some("application/zip".to_string()),
            converted: vec!["First".to_string(), "Second".to_string()],
            failures: vec!["Failed to process not-a-url: invalid URL".to_string()],
            error: None,
        };

        let output = format_summary(&report);
        assert!(output.starts_with("Saved: out/articles.zip\n"));
        assert!(output.contains("Converted: 2\n  - First\n  - Second\n"));
        assert!(output.ends_with("Failed: 1\n  - Failed to process not-a-url: invalid URL"));
    }

    #[test]
    fn test_format_summary_without_failures() {
        let report = ConvertReport {
            artifact: Some(PathBuf::from("Story.txt")),
            converted: vec!["Story".to_string()],
            ..Default::default()
        };
        let output = format_summary(&report);
        assert!(!output.contains("Failed"));
        assert!(output.ends_with("  - Story"));
    }

    #[test]
    fn test_error_report() {
        let err = BatchError::no_successes(vec!["Failed to process x: invalid URL".to_string()]);
        let report = error_report(&err);
        assert_eq!(report.failures.len(), 1);
        assert!(report.artifact.is_none());
        assert!(report
            .error
            .unwrap()
            .starts_with("No articles could be processed."));

        let json = serde_json::to_value(error_report(&BatchError::Validation(
            "No URLs provided".to_string(),
        )))
        .unwrap();
        assert_eq!(json["error"], "No URLs provided");
        assert!(json.get("artifact").is_none());
    }
}
