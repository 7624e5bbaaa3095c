use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "evd")]
#[command(about = "EventDesk roster CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// People roster commands
    Roster {
        #[command(subcommand)]
        cmd: RosterCmd,
    },

    /// Form-submission intake commands
    Intake {
        #[command(subcommand)]
        cmd: IntakeCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> venue -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum RosterCmd {
    /// Create a new roster CSV with the canonical header row
    Init {
        /// Roster CSV path (falls back to EVD_ROSTER_PATH)
        #[arg(long)]
        path: Option<String>,
    },

    /// Print roster schema and rows
    Show {
        /// Roster CSV path (falls back to EVD_ROSTER_PATH)
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Subcommand)]
enum IntakeCmd {
    /// Run one form submission through the intake boundary
    Submit {
        /// Roster CSV path (falls back to config, then EVD_ROSTER_PATH)
        #[arg(long)]
        roster: Option<String>,

        /// Submission payload JSON string (named-values object)
        #[arg(long, conflicts_with = "payload_file")]
        payload: Option<String>,

        /// Path to a payload JSON file (recommended on Windows)
        #[arg(long = "payload-file", conflicts_with = "payload")]
        payload_file: Option<String>,

        /// Intake log JSONL path (falls back to config; omit to disable)
        #[arg(long)]
        log: Option<String>,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Verify the hash chain of an intake log
    VerifyLog {
        /// Intake log JSONL path
        #[arg(long)]
        path: String,
    },
}

fn main() -> Result<()> {
    // .env is dev convenience only; absence is fine.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Roster { cmd } => match cmd {
            RosterCmd::Init { path } => commands::roster::init(path),
            RosterCmd::Show { path } => commands::roster::show(path),
        },

        Commands::Intake { cmd } => match cmd {
            IntakeCmd::Submit {
                roster,
                payload,
                payload_file,
                log,
                config_paths,
            } => commands::intake::submit(roster, payload, payload_file, log, config_paths),
            IntakeCmd::VerifyLog { path } => commands::intake::verify_log(&path),
        },

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = evd_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(())
        }
    }
}
