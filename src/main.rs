use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xlsx_translator::task::{TaskFile, TaskSpec};
use xlsx_translator::translation::missing_placeholders;
use xlsx_translator::utils::format_progress;
use xlsx_translator::workbook::list_sheets;
use xlsx_translator::{
    AppConfig, CredentialStore, Language, TaskManager, TranslationClient, TranslationTask,
};

#[derive(Debug, Parser)]
#[command(name = "xlsx-translator", version, about = "Translate Excel cell ranges with an LLM")]
struct Cli {
    /// Application config file (TOML); defaults apply when it is absent.
    #[arg(long, global = true, default_value = "xlsx-translator.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate one range into one or more languages.
    Translate {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        sheet: String,
        /// Cell range such as A1:B4.
        #[arg(long)]
        range: String,
        /// Source language; defaults to the configured one.
        #[arg(long)]
        from: Option<String>,
        #[arg(long = "to", required = true, num_args = 1..)]
        to: Vec<String>,
        /// Keep the original text above the translation in each cell.
        #[arg(long)]
        comparison: bool,
        /// Field or industry the content belongs to.
        #[arg(long)]
        field: Option<String>,
        /// File holding a custom prompt template.
        #[arg(long)]
        prompt_file: Option<PathBuf>,
    },
    /// Run every [[task]] of a TOML task file concurrently.
    Run { tasks: PathBuf },
    /// List the sheets of a workbook.
    Sheets { file: PathBuf },
    /// List supported languages.
    Languages,
    /// Store the API key in the user config file.
    SetKey { key: String },
    /// Report placeholders missing from a prompt template file.
    CheckPrompt { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(Some(&cli.config));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("xlsx_translator={}", config.logging.level)))
        .unwrap_or_else(|_| EnvFilter::new("xlsx_translator=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Translate {
            file,
            sheet,
            range,
            from,
            to,
            comparison,
            field,
            prompt_file,
        } => {
            let prompt = match prompt_file {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("reading prompt file {}", path.display()))?,
                ),
                None => None,
            };
            let spec = TaskSpec {
                file,
                sheet,
                cell_range: range,
                current_language: from,
                target_languages: to,
                comparison_mode: comparison,
                prompt,
                field,
            };
            run_tasks(&config, vec![spec]).await
        }
        Command::Run { tasks } => {
            let file = TaskFile::load(&tasks)
                .with_context(|| format!("loading task file {}", tasks.display()))?;
            if file.tasks.is_empty() {
                bail!("{} contains no [[task]] entries", tasks.display());
            }
            run_tasks(&config, file.tasks).await
        }
        Command::Sheets { file } => {
            for name in list_sheets(&file)? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Languages => {
            for lang in Language::ALL {
                println!("{}", lang);
            }
            Ok(())
        }
        Command::SetKey { key } => {
            let mut store = CredentialStore::open_default()?;
            store.save_api_key(&key)?;
            println!("API key saved to {}", store.path().display());
            Ok(())
        }
        Command::CheckPrompt { file } => check_prompt(&file),
    }
}

async fn run_tasks(config: &AppConfig, specs: Vec<TaskSpec>) -> anyhow::Result<()> {
    let default_source: Language = config
        .translation
        .source_language
        .parse()
        .context("translation.source_language in config")?;

    let tasks = specs
        .into_iter()
        .map(|spec| TranslationTask::from_spec(spec, default_source))
        .collect::<Result<Vec<_>, _>>()?;

    for task in &tasks {
        let missing = missing_placeholders(task.prompt().as_text());
        if !missing.is_empty() {
            tracing::warn!(
                missing = %missing.join(", "),
                "Prompt template is missing placeholders; the fallback template will be used"
            );
        }
    }

    let store = CredentialStore::open_default()?;
    let api_key = store.api_key().unwrap_or_default();
    let client = TranslationClient::new(&config.api, api_key)?;
    tracing::info!(model = client.model(), "Using translation model");

    let mut manager = TaskManager::new(Arc::new(client));
    let ids: Vec<_> = tasks.into_iter().map(|task| manager.add(task)).collect();

    let mut tokens = Vec::with_capacity(ids.len());
    for &id in &ids {
        manager.start(id).await?;
        if let Some(token) = manager.cancel_token(id)? {
            tokens.push(token);
        }

        let mut progress = manager.subscribe(id)?;
        tokio::spawn(async move {
            while progress.changed().await.is_ok() {
                let percent = *progress.borrow_and_update();
                tracing::info!(task_id = %id, progress = %format_progress(percent as usize, 100), "Progress");
            }
        });
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling tasks after their current cell");
            for token in &tokens {
                token.cancel();
            }
        }
    });

    let mut failures = 0;
    for (id, outcome) in manager.wait_all().await {
        match outcome {
            Ok(report) => {
                for (lang, path) in &report.outputs {
                    println!("{} {}: {}", id, lang, path.display());
                }
            }
            Err(e) => {
                failures += 1;
                let status = manager.status(id).await?.status;
                eprintln!("{} {}: {}", id, status, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} task(s) did not complete", failures, ids.len());
    }
    Ok(())
}

fn check_prompt(path: &Path) -> anyhow::Result<()> {
    let template = std::fs::read_to_string(path)
        .with_context(|| format!("reading prompt file {}", path.display()))?;
    let missing = missing_placeholders(&template);
    if missing.is_empty() {
        println!("OK: all placeholders present");
        Ok(())
    } else {
        bail!("Missing required placeholders: {}", missing.join(", "))
    }
}
