use std::fmt;

use quiz_core::model::{Language, UserId};
use services::{QuizServices, Randomness};
use tokio::io::{AsyncBufReadExt, BufReader};

mod render;
mod terminal;

use terminal::Keyboard;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSeed { raw: String },
    InvalidUser { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--seed <u64>] [--user <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://questions.db");
    eprintln!("  --user 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SEED, QUIZ_USER, RUST_LOG");
    eprintln!();
    eprintln!("Create a question database with: cargo run -p storage --bin seed");
}

#[derive(Debug)]
struct Args {
    db_url: String,
    seed: Option<u64>,
    user_id: UserId,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://questions.db".into(), normalize_sqlite_url);
        let mut seed = std::env::var("QUIZ_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());
        let mut user_id = std::env::var("QUIZ_USER")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .unwrap_or_else(|| UserId::new(1));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    user_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUser { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            seed,
            user_id,
        })
    }

    fn randomness(&self) -> Randomness {
        self.seed.map_or_else(Randomness::entropy, Randomness::seeded)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    log::debug!("starting with {args:?}");

    // A missing question store is fatal; sessions never start without one.
    let services = QuizServices::new_sqlite(&args.db_url, args.randomness())
        .await
        .map_err(|e| {
            log::error!("question store at {} is unavailable: {e}", args.db_url);
            eprintln!("⚠ Ma'lumotlar bazasi topilmadi! / База данных не найдена!");
            e
        })?;
    let controller = services.controller();
    let user_id = args.user_id;

    let greeting = controller.restart(user_id).await;
    println!("{}", render::reply(&greeting, Language::Uz));
    let mut keyboard = Keyboard::for_reply(&greeting);
    let mut lang = Language::Uz;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(event) = keyboard.decode(&line) else {
            println!("{}", render::unrecognized(lang));
            continue;
        };

        match controller.handle(user_id, event).await {
            Ok(reply) => {
                if let Some(picked) = terminal::reply_language(&reply) {
                    lang = picked;
                }
                println!("{}\n", render::reply(&reply, lang));
                keyboard = Keyboard::for_reply(&reply);
            }
            Err(e) => {
                log::warn!("user {user_id}: {e}");
                println!("{}\n", render::error(&e, lang));
            }
        }
    }

    log::info!("input closed, {} session(s) still open", services.sessions().tracked_users());
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
