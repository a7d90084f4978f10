use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "musclelog", version, about = "Musclelog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day records: stamps, bodyweight, memo
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Bodyweight trend
    Weight {
        #[command(subcommand)]
        action: commands::weight::WeightAction,
    },
    /// Show the week or month grid with stamped body parts
    Calendar(commands::calendar::CalendarArgs),
    /// Reference media folders
    Folder {
        #[command(subcommand)]
        action: commands::folder::FolderAction,
    },
    /// Stopwatch and countdown
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MUSCLELOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record { action } => commands::record::run(action),
        Commands::Weight { action } => commands::weight::run(action),
        Commands::Calendar(args) => commands::calendar::run(args),
        Commands::Folder { action } => commands::folder::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "musclelog", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
