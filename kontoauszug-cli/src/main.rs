use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kontoauszug_core::{render_entries, Entry};
use kontoauszug_finance::Importer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

mod config;
mod state;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("KONTOAUSZUG_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "kontoauszug",
    version,
    long_version = LONG_VERSION,
    about = "Import Volksbank Siegerland statements into a beancount ledger"
)]
struct Cli {
    /// Config file (default: ~/.kontoauszug/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a file is a statement this importer understands
    Identify {
        /// Statement PDF or extracted text
        file: PathBuf,
    },

    /// Extract balances and transactions from a statement
    Extract {
        /// Statement PDF or extracted text
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Beancount)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(long, conflicts_with = "append")]
        output: Option<PathBuf>,

        /// Append to the target_journal from the config
        #[arg(long)]
        append: bool,

        /// Extract even if the file is not identified as a statement
        #[arg(long)]
        force: bool,
    },

    /// Print the ledger account a statement belongs to
    FileAccount {
        file: PathBuf,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file (never overwrites)
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Beancount,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(p) => p,
        None => config::default_config_path()?,
    };

    match cli.command {
        Command::Identify { file } => {
            let importer = config::load_config(&config_path)?.importer(&config_path)?;
            let identified = importer
                .identify(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{}", if identified { "yes" } else { "no" });
            if !identified {
                std::process::exit(1);
            }
        }

        Command::Extract {
            file,
            format,
            output,
            append,
            force,
        } => {
            let importer = config::load_config(&config_path)?.importer(&config_path)?;
            let result = if force {
                importer.extract(&file)
            } else {
                importer.extract_checked(&file)
            };
            let entries = result.with_context(|| format!("importing {}", file.display()))?;

            let rendered = render(&entries, format)?;

            if append {
                let Some(journal) = importer.config().target_journal.clone() else {
                    bail!(
                        "--append needs importer.target_journal in {}",
                        config_path.display()
                    );
                };
                append_to(&journal, &rendered)?;
                println!("Appended {} entries to {}", entries.len(), journal.display());
            } else if let Some(out) = output {
                std::fs::write(&out, &rendered)
                    .with_context(|| format!("write {}", out.display()))?;
                println!("Wrote {} entries to {}", entries.len(), out.display());
            } else {
                print!("{}", rendered);
            }
        }

        Command::FileAccount { file } => {
            let importer = config::load_config(&config_path)?.importer(&config_path)?;
            println!("{}", importer.file_account(&file));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn render(entries: &[Entry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Beancount => Ok(render_entries(entries)),
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(entries).context("serialize entries")?;
            s.push('\n');
            Ok(s)
        }
    }
}

fn append_to(journal: &Path, rendered: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal)
        .with_context(|| format!("open {}", journal.display()))?;
    writeln!(f).with_context(|| format!("write {}", journal.display()))?;
    f.write_all(rendered.as_bytes())
        .with_context(|| format!("write {}", journal.display()))?;
    Ok(())
}
