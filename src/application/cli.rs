#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BenchmarkHistory;
use crate::domain::models::BenchmarkRequest;
use crate::domain::models::BenchmarkResult;
use crate::domain::models::HealthStatus;
use crate::domain::models::QuantizationLevel;
use crate::domain::models::QueryResponse;
use crate::domain::models::Technique;
use crate::domain::services::events::help_text;
use crate::domain::services::HealthMonitor;
use crate::domain::services::MetricCards;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Plain text rendering of an answer and its citations.
pub fn format_answer(res: &QueryResponse, api_url: &str) -> String {
    let mut text = res.answer.trim().to_string();
    if res.sources.is_empty() {
        return text;
    }

    text = format!("{text}\n\nSources:");
    for (idx, source) in res.sources.iter().enumerate() {
        text = format!(
            "{text}\n  [{}] {} ({}, distance {:.3})",
            idx + 1,
            source.label(idx),
            source.match_quality(),
            source.score
        );
        if let Some(link) = source.link(api_url) {
            text = format!("{text}\n      {link}");
        }
    }

    return text;
}

pub fn format_benchmark(res: &BenchmarkResult) -> String {
    let mut cards = MetricCards::baseline(&res.metrics);
    if Technique::parse(&res.technique) != Some(Technique::Baseline) {
        cards = MetricCards::comparison(&res.metrics, res.improvements.as_ref());
    }

    let mut lines = vec![format!("{} ({})", res.technique, res.model_name)];
    lines.extend(
        MetricCards::as_text(&cards)
            .into_iter()
            .map(|e| return format!("  {e}")),
    );

    return lines.join("\n");
}

pub fn format_history(history: &BenchmarkHistory) -> String {
    if history.history.is_empty() {
        return "No benchmarks have been run yet.".to_string();
    }

    return history
        .history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let mut cards = MetricCards::baseline(&entry.metrics);
            if entry.before_metrics.is_some() {
                cards = MetricCards::comparison(&entry.metrics, entry.improvement_percent.as_ref());
            }

            let mut lines = vec![format!("{}. {} ({})", idx + 1, entry.technique, entry.model_name)];
            lines.extend(
                MetricCards::as_text(&cards)
                    .into_iter()
                    .map(|e| return format!("  {e}")),
            );
            return lines.join("\n");
        })
        .collect::<Vec<String>>()
        .join("\n\n");
}

/// Builds the request for a one off benchmark from the configured level and
/// ratio.
pub fn benchmark_request(technique: Technique, question: Option<String>) -> Result<BenchmarkRequest> {
    match technique {
        Technique::Baseline => return Ok(BenchmarkRequest::Baseline { question }),
        Technique::Quantization => {
            return Ok(BenchmarkRequest::Quantization {
                level: Config::quantization_level()?,
                question,
            });
        }
        Technique::Pruning => {
            return Ok(BenchmarkRequest::Pruning {
                ratio: Config::pruning_ratio()?,
                question,
            });
        }
    }
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn ask(question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question cannot be blank");
    }

    let backend = BackendManager::get()?;
    let res = backend.query(question).await?;
    println!("{}", format_answer(&res, &Config::get(ConfigKey::ApiUrl)));

    return Ok(());
}

async fn health() -> Result<()> {
    let backend = BackendManager::get()?;
    let status = HealthMonitor::check(&backend).await;
    let label = format!("{} {}", status.symbol(), status.label());

    if status != HealthStatus::Healthy {
        bail!(format!("{label} at {}", Config::get(ConfigKey::ApiUrl)));
    }

    println!("{}", label.green());
    return Ok(());
}

async fn benchmark(matches: &ArgMatches) -> Result<()> {
    let technique_str = matches
        .get_one::<String>("technique")
        .map(|e| return e.to_string())
        .unwrap_or_default();
    let Some(technique) = Technique::parse(&technique_str) else {
        bail!(format!("Unknown benchmark technique '{technique_str}'"));
    };
    let question = matches.get_one::<String>("question").map(|e| return e.to_string());

    let backend = BackendManager::get()?;
    let res = backend
        .run_benchmark(benchmark_request(technique, question)?)
        .await
        .map_err(|err| return anyhow!(format!("Failed to run {technique} benchmark: {err}")))?;

    println!("{}", format_benchmark(&res));
    return Ok(());
}

async fn history() -> Result<()> {
    let backend = BackendManager::get()?;
    let res = backend.benchmark_history().await?;
    println!("{}", format_history(&res));

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Asks a single question and prints the answer with its sources.")
        .arg(
            Arg::new("question")
                .help("The question to ask about your documents.")
                .required(true),
        );
}

fn subcommand_benchmark() -> Command {
    return Command::new("benchmark")
        .about("Runs a single benchmark. Quantization and pruning use the configured level and ratio.")
        .arg(
            Arg::new("technique")
                .help("Which optimization technique to benchmark.")
                .value_parser(PossibleValuesParser::new(Technique::VARIANTS))
                .required(true),
        )
        .arg(
            Arg::new("question")
                .long("question")
                .num_args(1)
                .help("Question to benchmark with. The backend picks its own when omitted."),
        );
}

fn arg_pruning_ratio() -> Arg {
    return Arg::new(ConfigKey::PruningRatio.to_string())
        .long(ConfigKey::PruningRatio.to_string())
        .env("DOCCHAT_PRUNING_RATIO")
        .num_args(1)
        .help(format!(
            "Initial share of weights removed by the pruning benchmark. [default: {}]",
            Config::default(ConfigKey::PruningRatio)
        ))
        .value_parser(PossibleValuesParser::new(["0.1", "0.2", "0.3", "0.4", "0.5"]))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.ends_with("HOTKEYS:") {
                return line.bold().underline().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("docchat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the interactive chat. This is the default."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_benchmark())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("health").about("Checks whether the backend is reachable and healthy."))
        .subcommand(Command::new("history").about("Lists every benchmark run the backend remembers."))
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .short('u')
                .long(ConfigKey::ApiUrl.to_string())
                .env("DOCCHAT_API_URL")
                .num_args(1)
                .help(format!("Base URL of the question answering backend. [default: {}]", Config::default(ConfigKey::ApiUrl)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("DOCCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckInterval.to_string())
                .long(ConfigKey::HealthCheckInterval.to_string())
                .env("DOCCHAT_HEALTH_CHECK_INTERVAL")
                .num_args(1)
                .help(format!("Time in milliseconds between backend health checks. [default: {}]", Config::default(ConfigKey::HealthCheckInterval)))
                .global(true),
        )
        .arg(arg_pruning_ratio())
        .arg(
            Arg::new(ConfigKey::QuantizationLevel.to_string())
                .long(ConfigKey::QuantizationLevel.to_string())
                .env("DOCCHAT_QUANTIZATION_LEVEL")
                .num_args(1)
                .help(format!("Initial quantization level for the quantization benchmark. [default: {}]", Config::default(ConfigKey::QuantizationLevel)))
                .value_parser(PossibleValuesParser::new(QuantizationLevel::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ShowDashboard.to_string())
                .long(ConfigKey::ShowDashboard.to_string())
                .env("DOCCHAT_SHOW_DASHBOARD")
                .num_args(1)
                .help(format!("Whether the optimization dashboard is open on start. [default: {}]", Config::default(ConfigKey::ShowDashboard)))
                .value_parser(PossibleValuesParser::new(["true", "false"]))
                .global(true),
        );
}

/// Returns true when the interactive chat should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let question = subcmd_matches
                .get_one::<String>("question")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            ask(&question).await?;
            return Ok(false);
        }
        Some(("benchmark", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            benchmark(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("health", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            health().await?;
            return Ok(false);
        }
        Some(("history", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            history().await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
