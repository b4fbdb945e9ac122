use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use stangometru::certificate::{
    self, CertificateError, CertificateRenderer, CertificateRequest, ImageAvatarDecoder,
    RasterProvider, RecordingProvider, RenderedCertificate, SurfaceProvider, FAILURE_NOTICE,
};
use stangometru::config::Config;
use stangometru::content::{QuestionSet, ResultTable};
use stangometru::quiz::{self, Prompter};
use stangometru::results::{self, ResultsView};
use stangometru::scoring::ScoringEngine;
use stangometru::{browser, config, content, output, resolver, telemetry};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONTENT: i32 = 1;
const EXIT_CERTIFICATE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take the test interactively (default if no subcommand)
    Take {
        /// Also export the submission as JSON to this path
        #[arg(long)]
        save_submission: Option<PathBuf>,
    },
    /// Show the results screen for an exported submission
    Results {
        /// Submission JSON written by `take --save-submission`
        #[arg(long)]
        submission: Option<PathBuf>,
    },
    /// Print the outcome a raw score falls into
    Resolve {
        /// Raw score in points (10 points = 1 cm)
        #[arg(long, allow_hyphen_values = true)]
        score: i64,
    },
    /// Render a certificate without taking the test
    Certificate {
        /// Name printed on the certificate
        #[arg(long)]
        name: String,
        /// Raw score in points (10 points = 1 cm)
        #[arg(long, allow_hyphen_values = true)]
        score: i64,
        /// Image to place in the portrait circle
        #[arg(long)]
        avatar: Option<PathBuf>,
        /// Directory to save into (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Open the saved certificate afterwards
        #[arg(long)]
        open: bool,
        /// Write a text plan of the drawing instead of a PNG
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the config and content files
    Validate,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "stangometru")]
#[command(about = "Ștangometru: answer the test, get your score and certificate", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/stangometru/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// What the user asked a certificate for
struct CertificateJob {
    name: String,
    score: i64,
    avatar: Option<PathBuf>,
    output_dir: PathBuf,
    open: bool,
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::Take {
        save_submission: None,
    });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = match config_path.map_or_else(config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let avatar_timeout = match config::avatar_timeout(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();

    match command {
        Commands::Take { save_submission } => {
            let (questions, table) = load_content_or_exit(&config);
            let mut engine = ScoringEngine::new(&questions);
            let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());

            let submission = match quiz::run_questionnaire(&mut engine, &mut prompter, use_colors) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Test aborted: {:#}", e);
                    std::process::exit(EXIT_CONTENT);
                }
            };

            if let Some(path) = save_submission {
                if let Err(e) = results::save_submission(&path, &submission) {
                    eprintln!("Failed to export submission: {:#}", e);
                }
            }

            let score = submission.score;
            let view = ResultsView::from_submission(Some(submission), &questions, &table);
            println!();
            println!("{}", output::format_results_view(&view, use_colors));

            let details = match quiz::prompt_certificate_details(&mut prompter) {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(error = %e, "certificate prompt closed");
                    None
                }
            };
            drop(prompter);

            if let Some(details) = details {
                let job = CertificateJob {
                    name: details.name,
                    score,
                    avatar: details.avatar,
                    output_dir: config.certificate.output_dir.clone(),
                    open: false,
                    dry_run: false,
                };
                if !run_certificate(&config, avatar_timeout, job).await {
                    std::process::exit(EXIT_CERTIFICATE);
                }
            }
        }
        Commands::Results { submission } => {
            let (questions, table) = load_content_or_exit(&config);
            let submission = match submission {
                Some(path) => match results::load_submission(&path) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("Failed to load submission: {:#}", e);
                        std::process::exit(EXIT_CONTENT);
                    }
                },
                None => None,
            };
            let view = ResultsView::from_submission(submission, &questions, &table);
            println!("{}", output::format_results_view(&view, use_colors));
        }
        Commands::Resolve { score } => {
            let (_, table) = load_content_or_exit(&config);
            println!("Scor: {}", output::format_score_label(score));
            match resolver::resolve(score, &table.results) {
                Some(outcome) => println!("{}", outcome.text),
                None => println!("Nu există rezultate definite."),
            }
        }
        Commands::Certificate {
            name,
            score,
            avatar,
            output_dir,
            open,
            dry_run,
        } => {
            if name.trim().is_empty() {
                eprintln!("Name must not be empty.");
                std::process::exit(EXIT_CERTIFICATE);
            }
            let job = CertificateJob {
                name,
                score,
                avatar,
                output_dir: output_dir.unwrap_or_else(|| config.certificate.output_dir.clone()),
                open,
                dry_run,
            };
            if !run_certificate(&config, avatar_timeout, job).await {
                std::process::exit(EXIT_CERTIFICATE);
            }
        }
        Commands::Validate => {
            let (questions, table) = load_content_or_exit(&config);
            println!(
                "OK: {} questions, {} results",
                questions.len(),
                table.results.len()
            );
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Load and validate both content files, exiting with EXIT_CONTENT on failure
fn load_content_or_exit(config: &Config) -> (QuestionSet, ResultTable) {
    let questions = match content::load_question_set(&config.content.questions) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Content error: {:#}", e);
            std::process::exit(EXIT_CONTENT);
        }
    };
    let results = match content::load_result_table(&config.content.results) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Content error: {:#}", e);
            std::process::exit(EXIT_CONTENT);
        }
    };

    let mut errors = Vec::new();
    if let Err(e) = content::validate_questions(&questions) {
        errors.extend(e);
    }
    if let Err(e) = content::validate_results(&results) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        eprintln!("Content errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONTENT);
    }

    (questions, results)
}

async fn render_with<P: SurfaceProvider>(
    provider: P,
    timeout: Duration,
    request: CertificateRequest,
) -> Result<RenderedCertificate, CertificateError> {
    CertificateRenderer::new(provider, ImageAvatarDecoder)
        .with_avatar_timeout(timeout)
        .render(request)
        .await
}

async fn produce_certificate(
    config: &Config,
    timeout: Duration,
    job: &CertificateJob,
) -> anyhow::Result<PathBuf> {
    let mut request = CertificateRequest::new(&job.name, output::format_score_label(job.score));
    if let Some(path) = &job.avatar {
        let bytes = read_avatar(path)?;
        request = request.with_avatar(bytes);
    }

    let rendered = if job.dry_run {
        render_with(RecordingProvider, timeout, request).await?
    } else {
        let provider = RasterProvider::new(config.certificate.fonts.clone());
        render_with(provider, timeout, request).await?
    };

    certificate::save_certificate(&rendered, &job.output_dir)
}

fn read_avatar(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read avatar at {}", path.display()))
}

/// Render, save and optionally open a certificate.
/// Any failure prints the single user-facing notice; details go to the log.
async fn run_certificate(config: &Config, timeout: Duration, job: CertificateJob) -> bool {
    match produce_certificate(config, timeout, &job).await {
        Ok(path) => {
            println!("Certificat salvat: {}", path.display());
            if job.open {
                if let Err(e) = browser::open_path(&path) {
                    eprintln!("Failed to open certificate: {}", e);
                }
            }
            true
        }
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "certificate generation failed");
            eprintln!("{}", FAILURE_NOTICE);
            false
        }
    }
}
