use chson::collect::{self, RenderTarget};
use chson::validation::{self, FileOutcome, FileReport};
use chson::{read_document, render, ChsonError, SchemaVersion};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const NOTES: &str = "\
Notes:
  - If a directory is provided, scans for *.chson.json recursively.
  - render outputs 2-column Markdown tables.
  - Supports both v1 and v2 schemas (auto-detected from $schema URL).";

/// ChSON CLI — validate and render JSON cheatsheets
#[derive(Parser)]
#[command(name = "chson", version, about, after_help = NOTES)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check documents against the schema named by their $schema URL
    Validate {
        /// Document files or directories to scan
        #[arg(required = true, value_name = "FILE_OR_DIR")]
        inputs: Vec<PathBuf>,
    },

    /// Render documents into another format
    Render {
        #[command(subcommand)]
        format: RenderFormat,
    },
}

#[derive(Subcommand)]
enum RenderFormat {
    /// Render 2-column Markdown tables
    Markdown {
        /// Document files or directories to scan
        #[arg(required = true, value_name = "FILE_OR_DIR")]
        inputs: Vec<PathBuf>,
        /// Write one .md file per input under this directory instead of stdout
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("{}", Cli::command().render_help());
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Invocation-level failures: bad paths are usage errors, anything else is a
/// plain failure.
fn exit_code(error: &ChsonError) -> u8 {
    match error {
        ChsonError::PathNotFound(_) | ChsonError::Glob(_) => 2,
        _ => 1,
    }
}

/// Run a command. `Ok(false)` means some document failed.
fn run(command: Command) -> chson::Result<bool> {
    match command {
        Command::Validate { inputs } => {
            let files = collect::collect_all(&inputs)?;
            log::info!("Validating {} file(s)", files.len());
            Ok(validation::validate_files(&files, print_file_report))
        }

        Command::Render {
            format: RenderFormat::Markdown { inputs, out },
        } => {
            let mut targets = Vec::new();
            for input in &inputs {
                targets.extend(collect::render_targets(input)?);
            }
            log::info!("Rendering {} file(s)", targets.len());

            let mut ok = true;
            for target in &targets {
                if let Err((version, e)) = render_target(target, out.as_deref()) {
                    ok = false;
                    report_failure(&target.path, version, None, &[e.to_string()]);
                }
            }
            Ok(ok)
        }
    }
}

fn print_file_report(report: &FileReport) {
    match &report.outcome {
        FileOutcome::Checked(result) if result.is_valid() => {
            println!("✓ {} ({})", report.path.display(), result.version);
        }
        FileOutcome::Checked(result) => {
            let details: Vec<String> = result
                .errors
                .iter()
                .map(|issue| format!("{}: {}", issue.path, issue.message))
                .collect();
            report_failure(
                &report.path,
                Some(result.version),
                Some(result.version.schema_path()),
                &details,
            );
        }
        FileOutcome::Failed(e) => report_failure(&report.path, None, None, &[e.to_string()]),
    }
}

/// Failure report on stderr, shared by `validate` and `render`:
///
/// ```text
/// ✗ <path> (<version>)      version omitted when the file never parsed
///   schema: <schema asset>  validation failures only
///   - <detail>              one line per error
/// ```
fn report_failure(
    path: &Path,
    version: Option<SchemaVersion>,
    schema: Option<&str>,
    details: &[String],
) {
    match version {
        Some(version) => eprintln!("✗ {} ({version})", path.display()),
        None => eprintln!("✗ {}", path.display()),
    }
    if let Some(schema) = schema {
        eprintln!("  schema: {schema}");
    }
    for detail in details {
        eprintln!("  - {detail}");
    }
}

/// Render one file. Errors carry the document version when the file parsed.
fn render_target(
    target: &RenderTarget,
    out_dir: Option<&Path>,
) -> Result<(), (Option<SchemaVersion>, ChsonError)> {
    let document = read_document(&target.path).map_err(|e| (None, e))?;
    let markdown = render::render_markdown(&document);
    write_markdown(target, &markdown, out_dir).map_err(|e| (Some(document.version()), e))
}

fn write_markdown(target: &RenderTarget, markdown: &str, out_dir: Option<&Path>) -> chson::Result<()> {
    match out_dir {
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
        }
        Some(out_dir) => {
            let out_path = target.output_path(out_dir);
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out_path, markdown)?;
            println!("{}", out_path.display());
        }
    }

    Ok(())
}
