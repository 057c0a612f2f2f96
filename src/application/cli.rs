use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CameraName;
use crate::domain::models::Facing;
use crate::domain::services::help_text;
use crate::domain::services::AuthService;
use crate::domain::services::SessionStore;
use crate::infrastructure::api::ApiManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Where the debug log is written. `LENSCHAT_LOG_DIR` overrides the cache dir.
pub fn debug_log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("LENSCHAT_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .map(|dir| return dir.join("lenschat"))
        .unwrap_or_else(|| return path::PathBuf::from(".lenschat"));
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
    file.write_all(Config::serialize_default(build())?.as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn login(token: &str, referral_code: &str) -> Result<()> {
    let auth = AuthService::new(ApiManager::get(), SessionStore::default());
    match auth.login(token, referral_code).await {
        Ok(()) => println!("{}", Paint::green("Signed in.")),
        Err(err) => println!("{}", Paint::red(err)),
    }

    return Ok(());
}

async fn logout() -> Result<()> {
    if Config::get(ConfigKey::SessionCookie).is_empty() {
        println!("You're not signed in.");
        return Ok(());
    }

    let auth = AuthService::new(ApiManager::get(), SessionStore::default());
    match auth.logout().await {
        Ok(()) => println!("Signed out."),
        Err(err) => println!("{}", Paint::red(err)),
    }

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

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for lenschat")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running lenschat with environment variable RUST_LOG=lenschat")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Signs in with a Google ID token and stores the session.")
        .arg(
            Arg::new("token")
                .long("token")
                .env("LENSCHAT_ID_TOKEN")
                .help("Google ID token to exchange for a session.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("referral-code")
                .long("referral-code")
                .help("Referral code of the person who invited you.")
                .num_args(1),
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new chat session.");
}

fn arg_camera() -> Arg {
    return Arg::new(ConfigKey::Camera.to_string())
        .long(ConfigKey::Camera.to_string())
        .env("LENSCHAT_CAMERA")
        .num_args(1)
        .help(format!(
            "Camera driver used for photos. [default: {}]",
            Config::default(ConfigKey::Camera)
        ))
        .value_parser(PossibleValuesParser::new(CameraName::VARIANTS))
        .global(true);
}

fn arg_camera_facing() -> Arg {
    return Arg::new(ConfigKey::CameraFacing.to_string())
        .long(ConfigKey::CameraFacing.to_string())
        .env("LENSCHAT_CAMERA_FACING")
        .num_args(1)
        .help(format!(
            "Camera the panel starts with. [default: {}]",
            Config::default(ConfigKey::CameraFacing)
        ))
        .value_parser(PossibleValuesParser::new(Facing::VARIANTS))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:")
                || line.starts_with("HOTKEYS:")
                || line.starts_with("CAMERA:")
            {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
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

    return Command::new("lenschat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Ends the stored session."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("LENSCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .long(ConfigKey::ApiUrl.to_string())
                .env("LENSCHAT_API_URL")
                .num_args(1)
                .help(format!("Base URL of the chat backend. [default: {}]", Config::default(ConfigKey::ApiUrl)))
                .global(true),
        )
        .arg(arg_camera())
        .arg(arg_camera_facing())
        .arg(
            Arg::new(ConfigKey::CameraFrontDevice.to_string())
                .long(ConfigKey::CameraFrontDevice.to_string())
                .env("LENSCHAT_CAMERA_FRONT_DEVICE")
                .num_args(1)
                .help(format!("Video device used as the front camera. [default: {}]", Config::default(ConfigKey::CameraFrontDevice)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::CameraRearDevice.to_string())
                .long(ConfigKey::CameraRearDevice.to_string())
                .env("LENSCHAT_CAMERA_REAR_DEVICE")
                .num_args(1)
                .help(format!("Video device used as the rear camera. [default: {}]", Config::default(ConfigKey::CameraRearDevice)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::FfmpegPath.to_string())
                .long(ConfigKey::FfmpegPath.to_string())
                .env("LENSCHAT_FFMPEG_PATH")
                .num_args(1)
                .help(format!("ffmpeg binary used by the ffmpeg camera. [default: {}]", Config::default(ConfigKey::FfmpegPath)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::PreferencesFile.to_string())
                .long(ConfigKey::PreferencesFile.to_string())
                .env("LENSCHAT_PREFERENCES_FILE")
                .num_args(1)
                .help(format!("Where the theme and session are kept. [default: {}]", Config::default(ConfigKey::PreferencesFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionCookie.to_string())
                .long(ConfigKey::SessionCookie.to_string())
                .env("LENSCHAT_SESSION_COOKIE")
                .num_args(1)
                .help("Session cookie to use instead of the stored one.")
                .hide(true)
                .global(true),
        );
}

async fn load_config(matches: Vec<&clap::ArgMatches>) -> Result<()> {
    Config::load(build(), matches).await?;
    SessionStore::default().restore().await?;
    return Ok(());
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = debug_log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            load_config(vec![&matches, subcmd_matches]).await?;
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
                println!("{}", Config::serialize_default(build())?);
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
        Some(("login", subcmd_matches)) => {
            load_config(vec![&matches, subcmd_matches]).await?;
            let token = subcmd_matches
                .get_one::<String>("token")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            let referral_code = subcmd_matches
                .get_one::<String>("referral-code")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            login(&token, &referral_code).await?;
            return Ok(false);
        }
        Some(("logout", subcmd_matches)) => {
            load_config(vec![&matches, subcmd_matches]).await?;
            logout().await?;
            return Ok(false);
        }
        _ => {
            load_config(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
