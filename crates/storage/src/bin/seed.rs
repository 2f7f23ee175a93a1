use std::fmt;

use quiz_core::model::{Category, Language};
use storage::repository::QuestionRecord;
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    reset: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite://questions.db".into());
        let mut reset = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--reset" => reset = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, reset })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://questions.db)");
    eprintln!("  --reset                   Delete existing questions before seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL");
}

fn sample_questions() -> Vec<QuestionRecord> {
    use Category::{Capitals, Football, Web};
    use Language::{Ru, Uz};

    let rows: &[(Category, Language, &str, &str)] = &[
        (Capitals, Uz, "Fransiyaning poytaxti qaysi?", "Parij"),
        (Capitals, Uz, "Italiyaning poytaxti qaysi?", "Rim"),
        (Capitals, Uz, "Yaponiyaning poytaxti qaysi?", "Tokio"),
        (Capitals, Uz, "Germaniyaning poytaxti qaysi?", "Berlin"),
        (Capitals, Uz, "O'zbekistonning poytaxti qaysi?", "Toshkent"),
        (Capitals, Ru, "Столица Франции?", "Париж"),
        (Capitals, Ru, "Столица Италии?", "Рим"),
        (Capitals, Ru, "Столица Японии?", "Токио"),
        (Capitals, Ru, "Столица Германии?", "Берлин"),
        (Capitals, Ru, "Столица Узбекистана?", "Ташкент"),
        (Web, Uz, "Sahifa tuzilishi uchun qaysi til ishlatiladi?", "HTML"),
        (Web, Uz, "Sahifani bezash uchun qaysi til ishlatiladi?", "CSS"),
        (Web, Uz, "Brauzerda ishlaydigan dasturlash tili?", "JavaScript"),
        (Web, Uz, "Xavfsiz HTTP protokoli qanday ataladi?", "HTTPS"),
        (Web, Ru, "Язык разметки веб-страниц?", "HTML"),
        (Web, Ru, "Язык стилей веб-страниц?", "CSS"),
        (Web, Ru, "Язык программирования в браузере?", "JavaScript"),
        (Web, Ru, "Защищённая версия HTTP?", "HTTPS"),
        (Football, Uz, "2018 yilgi jahon chempionatini kim yutgan?", "Fransiya"),
        (Football, Uz, "2014 yilgi jahon chempionatini kim yutgan?", "Germaniya"),
        (Football, Uz, "2010 yilgi jahon chempionatini kim yutgan?", "Ispaniya"),
        (Football, Uz, "2022 yilgi jahon chempionatini kim yutgan?", "Argentina"),
        (Football, Ru, "Кто выиграл чемпионат мира 2018 года?", "Франция"),
        (Football, Ru, "Кто выиграл чемпионат мира 2014 года?", "Германия"),
        (Football, Ru, "Кто выиграл чемпионат мира 2010 года?", "Испания"),
        (Football, Ru, "Кто выиграл чемпионат мира 2022 года?", "Аргентина"),
    ];

    rows.iter()
        .map(|(category, lang, text, answer)| QuestionRecord::new(*category, *lang, *text, *answer))
        .collect()
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;

    if args.reset {
        let removed = repo.clear_questions().await?;
        println!("Removed {removed} existing questions");
    }

    let samples = sample_questions();
    for record in &samples {
        repo.insert_question(record).await?;
    }

    println!("Seeded {} questions into {}", samples.len(), args.db_url);

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
