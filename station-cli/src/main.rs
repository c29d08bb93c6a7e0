#![deny(missing_docs)]
//! A command-line interface for number-station one-time-pad operations.

use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand};
use log::{error, info};
use station_core::error::PadError;
use station_core::store::PadStore;
use station_core::{crypto, examine, locator, pad_generator};
use std::fs;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Generate a pad store of 10 entries for agent NATASHA\nstation-cli --pads ./pads generate --scope NATASHA --count 10 --length 250\n\n# Find the oldest usable pad for NATASHA\nstation-cli --pads ./pads locate --scope NATASHA\n\n# Encrypt with automatic pad selection\nstation-cli --pads ./pads encrypt --scope NATASHA --message \"RV at dawn\"\n\n# Decrypt a received transmission\nstation-cli --pads ./pads decrypt --pad ./pads/NATASHA/NATASHA-2026-08-24.json --index 0 --message \"8f3a1 09c2e 7\"\n\n# Inventory of remaining key material\nstation-cli --pads ./pads examine --scope NATASHA"
)]
struct Cli {
    /// Root directory holding pad store files (scoped pads live in subdirectories).
    #[arg(long, global = true, default_value = "pads")]
    pads: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new pad store file
    Generate {
        /// Recipient scope (e.g. an agent name); pads land in a subdirectory of that name
        #[arg(short, long)]
        scope: Option<String>,

        /// Number of pad entries in the store
        #[arg(short, long, default_value = "5")]
        count: NonZeroU32,

        /// Key length per entry in bytes (rounded up to a multiple of 5)
        #[arg(short, long, default_value = "250")]
        length: NonZeroUsize,
    },
    /// Locate the oldest pad entry eligible for encryption
    Locate {
        /// Recipient scope to search; omit to search the pad root
        #[arg(short, long)]
        scope: Option<String>,

        /// Only consider entries whose key holds at least this many bytes
        #[arg(long, value_name = "BYTES")]
        min_length: Option<usize>,

        /// Consider consumed entries too (audit use; never encrypt with one)
        #[arg(long)]
        include_consumed: bool,
    },
    /// Encrypt a message, consuming one pad entry
    #[command(group(ArgGroup::new("source").required(true)))]
    Encrypt {
        /// Message text to encrypt
        #[arg(short, long, group = "source")]
        message: Option<String>,

        /// Read the message from a file instead
        #[arg(short, long, group = "source", value_name = "FILE")]
        input: Option<PathBuf>,

        /// Use this specific pad store file (requires --index)
        #[arg(long, requires = "index", value_name = "FILE")]
        pad: Option<PathBuf>,

        /// Entry index within the pad store given by --pad
        #[arg(long, requires = "pad")]
        index: Option<u32>,

        /// Recipient scope for automatic pad selection (ignored with --pad)
        #[arg(short, long, conflicts_with = "pad")]
        scope: Option<String>,
    },
    /// Decrypt a grouped-hex transmission
    #[command(group(ArgGroup::new("source").required(true)))]
    Decrypt {
        /// Ciphertext hex (whitespace between groups is ignored)
        #[arg(short, long, group = "source")]
        message: Option<String>,

        /// Read the ciphertext hex from a file instead
        #[arg(short, long, group = "source", value_name = "FILE")]
        input: Option<PathBuf>,

        /// The pad store file the sender drew from
        #[arg(long, value_name = "FILE")]
        pad: PathBuf,

        /// Entry index within the pad store
        #[arg(long)]
        index: u32,
    },
    /// Summarize pad store files and remaining key material
    Examine {
        /// Recipient scope to inventory; omit for the pad root
        #[arg(short, long)]
        scope: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), PadError> {
    match &cli.command {
        Commands::Generate {
            scope,
            count,
            length,
        } => {
            let (store, path) =
                pad_generator::generate(&cli.pads, scope.as_deref(), *count, *length, Utc::now())?;
            info!(
                "created pad store {} with {} entries",
                store.id(),
                store.len()
            );
            println!("{}", path.display());
        }
        Commands::Locate {
            scope,
            min_length,
            include_consumed,
        } => {
            let found =
                locator::find(&cli.pads, scope.as_deref(), *min_length, !*include_consumed)?;
            println!("Pad file:    {}", found.store_path.display());
            println!("Entry index: {}", found.entry_index);
            println!("Store id:    {}", found.store_id);
        }
        Commands::Encrypt {
            message,
            input,
            pad,
            index,
            scope,
        } => {
            let plaintext = read_message_bytes(message.as_ref(), input.as_ref())?;
            let (store_path, entry_index) = match (pad, index) {
                (Some(path), Some(i)) => (path.clone(), *i),
                _ => {
                    let found = locator::find(
                        &cli.pads,
                        scope.as_deref(),
                        Some(plaintext.len()),
                        true,
                    )?;
                    info!(
                        "automatically selected pad store {} entry {} at {}",
                        found.store_id,
                        found.entry_index,
                        found.store_path.display()
                    );
                    (found.store_path, found.entry_index)
                }
            };
            let mut store = PadStore::load(&store_path)?;
            let ciphertext =
                crypto::encrypt(&mut store, &store_path, entry_index, &plaintext, Utc::now())?;
            info!(
                "encrypted {} bytes with pad store {} entry {entry_index}",
                plaintext.len(),
                store.id()
            );
            println!("{ciphertext}");
        }
        Commands::Decrypt {
            message,
            input,
            pad,
            index,
        } => {
            let ciphertext = read_message_text(message.as_ref(), input.as_ref())?;
            let store = PadStore::load(pad)?;
            let plaintext = crypto::decrypt(&store, *index, &ciphertext)?;
            println!("{}", String::from_utf8_lossy(&plaintext));
        }
        Commands::Examine { scope } => {
            let summaries = examine::examine(&cli.pads, scope.as_deref())?;
            if summaries.is_empty() {
                println!("No pad files found in '{}'", cli.pads.display());
                return Ok(());
            }
            println!(
                "{:<36} {:<16} {:>7} {:>10} {:>9}",
                "File", "Store ID", "Entries", "Available", "Max bytes"
            );
            println!("{:-<82}", "");
            for summary in summaries {
                if let Some(problem) = summary.error {
                    println!("{:<36} unreadable: {problem}", summary.file_name);
                } else {
                    println!(
                        "{:<36} {:<16} {:>7} {:>10} {:>9}",
                        summary.file_name,
                        summary.store_id.unwrap_or_default(),
                        summary.total_entries,
                        summary.unconsumed_entries,
                        summary.max_message_len
                    );
                }
            }
        }
    }
    Ok(())
}

fn read_message_bytes(
    message: Option<&String>,
    input: Option<&PathBuf>,
) -> Result<Vec<u8>, PadError> {
    match (message, input) {
        (Some(text), _) => Ok(text.clone().into_bytes()),
        (None, Some(path)) => fs::read(path).map_err(|source| PadError::Persistence {
            path: path.clone(),
            source,
        }),
        (None, None) => unreachable!("clap enforces a message source"),
    }
}

fn read_message_text(
    message: Option<&String>,
    input: Option<&PathBuf>,
) -> Result<String, PadError> {
    match (message, input) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => fs::read_to_string(path).map_err(|source| PadError::Persistence {
            path: path.clone(),
            source,
        }),
        (None, None) => unreachable!("clap enforces a message source"),
    }
}
