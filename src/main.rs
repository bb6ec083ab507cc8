use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use repobrief_core::bootstrap::{AppService, build_service};
use repobrief_core::DEFAULT_TOP_K;
use repobrief_core::config::{Config, resolve_config_path};

#[derive(Parser, Debug)]
#[command(
    name = "repobrief",
    version,
    about = "Summarize a repository's files and commit history into a searchable store"
)]
struct Cli {
    /// Config file (default: $REPOBRIEF_CONFIG or config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a project, then index its files and poll its commits
    Create {
        /// Display name
        #[arg(long)]
        name: String,
        /// Repository URL, e.g. https://github.com/owner/repo
        #[arg(long)]
        url: String,
        /// Access token for private repositories
        #[arg(long)]
        token: Option<String>,
    },
    /// Index a project's files again (records are appended)
    Index { project_id: String },
    /// Fetch, summarize and store new commits
    Poll { project_id: String },
    /// Show stored commits and refresh them in the background
    Commits { project_id: String },
    /// Show indexed files
    Files { project_id: String },
    /// Ask a question about a project's code
    Ask {
        project_id: String,
        question: String,
        /// Number of closest files given to the model
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// List projects
    Projects,
    /// Delete a project and everything stored for it
    Delete { project_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    init_subscriber(&config_path);

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    config.validate()?;

    let service = build_service(&config).await?;
    let result = tokio::select! {
        r = run(&service, cli.command) => r,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted");
            Ok(())
        }
    };
    service.store().close().await;
    result
}

async fn run(service: &AppService, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Create { name, url, token } => {
            let summary = service
                .create_project(&name, &url, token.as_deref())
                .await?;
            println!("project {} created", summary.project.id);
            println!(
                "indexed {}/{} files ({} stored) in {}ms",
                summary.index.files_summarized,
                summary.index.files_loaded,
                summary.index.files_stored,
                summary.index.duration_ms
            );
            print_errors(&summary.index.errors);
            println!("stored {} commits", summary.poll.inserted);
        }
        Command::Index { project_id } => {
            let report = service.index(&project_id).await?;
            println!(
                "indexed {}/{} files ({} stored) in {}ms",
                report.files_summarized, report.files_loaded, report.files_stored, report.duration_ms
            );
            print_errors(&report.errors);
        }
        Command::Poll { project_id } => {
            let report = service.poll(&project_id).await?;
            println!(
                "{} commits fetched, {} new stored",
                report.fetched, report.inserted
            );
        }
        Command::Commits { project_id } => {
            let view = service.commits(&project_id).await?;
            for c in &view.commits {
                let subject = c.commit_message.lines().next().unwrap_or_default();
                println!("{} {} {} {}", short_hash(&c.commit_hash), c.commit_date, c.commit_author_name, subject);
                for line in c.summary.lines() {
                    println!("    {line}");
                }
            }
            if let Some(refresh) = view.refresh
                && let Err(e) = refresh.await
            {
                tracing::warn!("background refresh task failed: {e}");
            }
        }
        Command::Files { project_id } => {
            for f in service.files(&project_id).await? {
                println!("{}: {}", f.file_name, f.summary);
            }
        }
        Command::Ask {
            project_id,
            question,
            top_k,
        } => {
            let answer = service.ask(&project_id, &question, top_k).await?;
            if answer.files_references.is_empty() {
                println!("project {project_id} has no indexed files");
                return Ok(());
            }
            println!("{}", answer.output);
            println!();
            println!("files referenced:");
            for f in &answer.files_references {
                println!("  {} ({:.3})", f.file_name, f.score);
            }
        }
        Command::Projects => {
            for p in service.projects().await? {
                println!("{} {} {}", p.id, p.name, p.github_url);
            }
        }
        Command::Delete { project_id } => {
            service.delete(&project_id).await?;
            println!("project {project_id} deleted");
        }
    }
    Ok(())
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

fn print_errors(errors: &[String]) {
    for e in errors {
        eprintln!("  skipped {e}");
    }
}

fn init_subscriber(config_path: &Path) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(feature = "otel")]
    {
        let config = Config::load(config_path).ok();
        let use_otlp = config
            .as_ref()
            .is_some_and(|c| c.observability.exporter == "otlp");

        if use_otlp {
            let endpoint = config
                .as_ref()
                .map_or("http://localhost:4317", |c| c.observability.endpoint.as_str());

            match setup_otel_tracer(endpoint) {
                Ok(tracer) => {
                    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt_layer)
                        .with(otel_layer)
                        .init();
                    return;
                }
                Err(e) => {
                    eprintln!("OTel initialization failed, falling back to fmt: {e}");
                }
            }
        }
    }

    #[cfg(not(feature = "otel"))]
    let _ = config_path;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(feature = "otel")]
fn setup_otel_tracer(endpoint: &str) -> anyhow::Result<opentelemetry_sdk::trace::SdkTracer> {
    use opentelemetry::trace::TracerProvider;
    use opentelemetry_otlp::WithExportConfig;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer("repobrief");
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracer)
}
