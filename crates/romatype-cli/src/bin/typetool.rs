use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use romatype_cli::commands::{self, config_ops, typing_ops};

#[derive(Parser)]
#[command(name = "typetool", about = "Romaji typing engine diagnostics")]
struct Cli {
    /// Custom keyconfig table TOML (replaces the embedded one)
    #[arg(long, global = true)]
    keyconfig: Option<String>,
    /// Custom search settings TOML
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the keys that may come next
    Predict {
        /// Kana reading of the line
        reading: String,
        /// Romaji typed so far
        #[arg(default_value = "")]
        input: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the best full romanization consistent with the input
    Best {
        /// Kana reading of the line
        reading: String,
        /// Romaji typed so far
        #[arg(default_value = "")]
        input: String,
        /// Tendency TOML with preferred spellings
        #[arg(long)]
        tendency: Option<String>,
        /// Use the built-in baseline tendency when no file is given
        #[arg(long)]
        baseline: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Romanize with canonical spellings, ignoring context
    Basic {
        /// Kana reading
        reading: String,
    },
    /// Explain slots, options, predictions and the search for a reading
    Explain {
        /// Kana reading of the line
        reading: String,
        /// Romaji typed so far
        #[arg(default_value = "")]
        input: String,
        /// Tendency TOML with preferred spellings
        #[arg(long)]
        tendency: Option<String>,
        /// Use the built-in baseline tendency when no file is given
        #[arg(long)]
        baseline: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Type the best romanization key by key
    Simulate {
        /// Kana reading of the line
        reading: String,
        /// Tendency TOML with preferred spellings
        #[arg(long)]
        tendency: Option<String>,
        /// Use the built-in baseline tendency when no file is given
        #[arg(long)]
        baseline: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the embedded keyconfig table TOML
    KeyconfigExport,
    /// Validate a keyconfig table TOML file
    KeyconfigValidate {
        /// TOML file to validate
        file: String,
    },
    /// Print the embedded baseline tendency TOML
    TendencyExport,
    /// Validate a tendency TOML file against the active keyconfig table
    TendencyValidate {
        /// TOML file to validate
        file: String,
    },
    /// Print the embedded default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// TOML file to validate
        file: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = cli.keyconfig.as_deref() {
        if let Err(e) = commands::install_keyconfig(path) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
    if let Some(path) = cli.settings.as_deref() {
        if let Err(e) = commands::install_settings(path) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    match cli.command {
        Command::Predict {
            reading,
            input,
            json,
        } => typing_ops::predict_cmd(&reading, &input, json),
        Command::Best {
            reading,
            input,
            tendency,
            baseline,
            json,
        } => typing_ops::best_cmd(&reading, &input, tendency.as_deref(), baseline, json),
        Command::Basic { reading } => typing_ops::basic_cmd(&reading),
        Command::Explain {
            reading,
            input,
            tendency,
            baseline,
            json,
        } => typing_ops::explain_cmd(&reading, &input, tendency.as_deref(), baseline, json),
        Command::Simulate {
            reading,
            tendency,
            baseline,
            json,
        } => typing_ops::simulate_cmd(&reading, tendency.as_deref(), baseline, json),
        Command::KeyconfigExport => config_ops::keyconfig_export(),
        Command::KeyconfigValidate { file } => config_ops::keyconfig_validate(&file),
        Command::TendencyExport => config_ops::tendency_export(),
        Command::TendencyValidate { file } => config_ops::tendency_validate(&file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
