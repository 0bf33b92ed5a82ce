use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sealnote::cli::{handle_decrypt, handle_encrypt, handle_inspect, PasswordArgs};
use sealnote::config::{SealPaths, Settings};
use sealnote::crypto::PBKDF2_ITERATIONS;
use sealnote::{SealError, SealResult};

/// Environment variable holding the log filter
const LOG_ENV: &str = "SEALNOTE_LOG";

#[derive(Parser)]
#[command(
    name = "sealnote",
    version,
    about = "Password-sealed, time-limited message envelopes",
    long_about = "SealNote encrypts a short message under a password and a time limit. \
                  The resulting text can be pasted into a chat or turned into a QR code; \
                  it opens only with the password and only until the time limit passes."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a message (reads stdin when MESSAGE is omitted)
    #[command(alias = "seal")]
    Encrypt {
        /// Message to seal
        message: Option<String>,
        /// Minutes the message stays valid
        #[arg(short, long, env = "SEALNOTE_TIME_LIMIT")]
        time_limit: Option<u64>,
        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Open a sealed message (reads stdin when ENVELOPE is omitted)
    #[command(alias = "open")]
    Decrypt {
        /// Envelope text
        envelope: Option<String>,
        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Show an envelope's framing without decrypting it
    Inspect {
        /// Envelope text
        envelope: Option<String>,
    },

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

impl Commands {
    /// Decrypt and inspect depend only on their input and the password
    fn needs_settings(&self) -> bool {
        matches!(self, Self::Encrypt { .. } | Self::Init | Self::Config)
    }
}

/// Paths and settings for the commands that use them
struct Loaded {
    paths: Option<SealPaths>,
    settings: Settings,
    problem: Option<SealError>,
}

impl Loaded {
    fn skipped() -> Self {
        Self {
            paths: None,
            settings: Settings::default(),
            problem: None,
        }
    }

    fn load() -> Self {
        let paths = match SealPaths::new() {
            Ok(paths) => paths,
            Err(err) => {
                return Self {
                    problem: Some(err),
                    ..Self::skipped()
                }
            }
        };
        let (settings, problem) = Settings::load_lenient(&paths);
        Self {
            paths: Some(paths),
            settings,
            problem,
        }
    }

    fn paths(&self) -> SealResult<&SealPaths> {
        self.paths.as_ref().ok_or_else(|| {
            SealError::Config("Could not determine the configuration directory".into())
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.command {
        Some(command) if command.needs_settings() => Loaded::load(),
        _ => Loaded::skipped(),
    };

    init_logging(&loaded.settings.log_level)?;
    if let Some(problem) = &loaded.problem {
        warn!(error = %problem, "using default settings");
    }

    if let Err(err) = run(cli.command, &loaded) {
        tracing::debug!(error = %err, "command failed");
        eprintln!("{}", err.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Option<Commands>, loaded: &Loaded) -> SealResult<()> {
    let settings = &loaded.settings;
    match command {
        Some(Commands::Encrypt {
            message,
            time_limit,
            password,
        }) => handle_encrypt(settings, message, time_limit, &password),
        Some(Commands::Decrypt { envelope, password }) => handle_decrypt(envelope, &password),
        Some(Commands::Inspect { envelope }) => handle_inspect(envelope),
        Some(Commands::Init) => {
            let paths = loaded.paths()?;
            settings.save(paths)?;
            println!("Settings written to {}", paths.settings_file().display());
            Ok(())
        }
        Some(Commands::Config) => {
            let paths = loaded.paths()?;
            println!("SealNote Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!(
                "  Default time limit:  {} minute(s)",
                settings.default_time_limit_minutes
            );
            println!("  Min password length: {}", settings.min_password_length);
            println!("  Log level:           {}", settings.log_level);
            println!();
            println!("Cipher suite:");
            println!("  Key derivation: PBKDF2-HMAC-SHA256, {} iterations", PBKDF2_ITERATIONS);
            println!("  Encryption:     AES-256-GCM");
            Ok(())
        }
        None => {
            println!("SealNote - password-sealed, time-limited messages");
            println!();
            println!("Run 'sealnote --help' for usage information.");
            Ok(())
        }
    }
}

/// Log to stderr so stdout carries only command output
fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {}", e))
}
