use anyhow::Result;
use clap::{Parser, Subcommand};

use kasboek::cli::{
    handle_budget_command, handle_category_command, handle_classify_command,
    handle_import_command, handle_transaction_command, BudgetCommands, CategoryCommands,
    ClassifyArgs, ImportArgs, TransactionCommands,
};
use kasboek::config::{paths::KasboekPaths, settings::Settings};
use kasboek::storage::Storage;

#[derive(Parser)]
#[command(
    name = "kasboek",
    version,
    about = "Personal budgeting from the command line",
    long_about = "kasboek tracks budget categories with planned and actual amounts, \
                  imports transactions from Rabobank CSV exports, and can suggest \
                  categories for unassigned transactions using an AI model or a \
                  local heuristic."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget overview commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Import transactions from a Rabobank CSV export
    Import(ImportArgs),

    /// Suggest categories for unassigned transactions
    Classify(ClassifyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = KasboekPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing kasboek at: {}", paths.data_dir().display());
            kasboek::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created.");
            println!("Run 'kasboek category list' to see them.");
            println!("Run 'kasboek import <file.csv>' to import a bank export.");
        }
        Some(Commands::Config) => {
            println!("kasboek Configuration");
            println!("=====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Classifier model:  {}", settings.classifier.model);
            println!("  Remote classifier: {}", settings.classifier.remote_enabled);
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import(args)) => {
            handle_import_command(&storage, args)?;
        }
        Some(Commands::Classify(args)) => {
            handle_classify_command(&storage, &settings, args)?;
        }
        None => {
            println!("kasboek - Personal budgeting from the command line");
            println!();
            println!("Run 'kasboek --help' for usage information.");
            println!("Run 'kasboek init' to get started.");
        }
    }

    Ok(())
}
