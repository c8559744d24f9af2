use std::fmt;
use std::path::PathBuf;

use learn_core::model::Module;
use services::{AppServices, Clock, ContentConfig, NavigationSession, RemoteContentConfig};
use storage::{ContentStatus, ContentStore, SourceStatus};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidModuleIndex { raw: String },
    InvalidRemoteUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidModuleIndex { raw } => write!(f, "invalid module index: {raw}"),
            ArgsError::InvalidRemoteUrl { raw } => write!(f, "invalid --remote-url value: {raw}"),
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
    eprintln!("  cargo run -p app -- [list]            [options]");
    eprintln!("  cargo run -p app -- lessons <module>  [options]");
    eprintln!("  cargo run -p app -- test <module>     [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bundle <dir>        Directory holding data.json and style.html");
    eprintln!("  --remote-url <url>    Remote module feed");
    eprintln!("  --offline             Skip the remote module feed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_BUNDLE_DIR, LEARN_REMOTE_URL, LEARN_REMOTE_DISABLED,");
    eprintln!("  LEARN_REMOTE_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Lessons(usize),
    Test(usize),
}

struct Args {
    command: Command,
    config: ContentConfig,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let default_bundle = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources");
        let mut config = ContentConfig::from_env(default_bundle);
        let mut command = Command::List;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "list" => command = Command::List,
                "lessons" => {
                    let value = require_value(&mut args, "lessons")?;
                    command = Command::Lessons(parse_index(value)?);
                }
                "test" => {
                    let value = require_value(&mut args, "test")?;
                    command = Command::Test(parse_index(value)?);
                }
                "--bundle" => {
                    config.bundle_dir = PathBuf::from(require_value(&mut args, "--bundle")?);
                }
                "--remote-url" => {
                    let value = require_value(&mut args, "--remote-url")?;
                    let remote = RemoteContentConfig::parse(&value)
                        .map_err(|_| ArgsError::InvalidRemoteUrl { raw: value.clone() })?;
                    config.remote = Some(remote);
                }
                "--offline" => config.remote = None,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { command, config }))
    }
}

fn parse_index(raw: String) -> Result<usize, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidModuleIndex { raw })
}

//
// ─── SHELL ─────────────────────────────────────────────────────────────────────
//

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, text: &str) -> std::io::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    input.next_line().await
}

fn describe_source(status: &SourceStatus) -> String {
    match status {
        SourceStatus::Pending => "pending".into(),
        SourceStatus::Loaded { modules } => format!("{modules} module(s)"),
        SourceStatus::Failed { reason } => format!("unavailable ({reason})"),
        SourceStatus::Disabled => "disabled".into(),
    }
}

fn print_status(status: &ContentStatus) {
    println!(
        "bundled: {}, remote: {}",
        describe_source(&status.local),
        describe_source(&status.remote)
    );
    if status.is_partial() {
        println!("some content is currently unavailable");
    }
}

fn print_module(index: usize, module: &Module) {
    println!(
        "[{index}] {} ({} lessons, {} questions)",
        module.category,
        module.lesson_count(),
        module.question_count()
    );
    if !module.content.description.is_empty() {
        println!("     {}", module.content.description);
    }
}

fn print_styled(session: &NavigationSession) {
    match session.current_styled_text() {
        Some(text) if !text.is_empty() => println!("\n{}\n", text.plain()),
        _ => println!("\n(this item could not be displayed)\n"),
    }
}

async fn run_lessons(
    session: &mut NavigationSession,
    module_index: usize,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    session.begin_module(module_index)?;
    session.select_lesson_link(Some(module_index));
    session.begin_lesson(0)?;

    while let Some(lesson) = session.current_lesson() {
        println!("── {} ──", lesson.title);
        print_styled(session);
        if !session.has_next_lesson()? {
            println!("End of module.");
            session.next_lesson()?;
            break;
        }
        if prompt(input, "Enter for the next lesson, q to stop: ")
            .await?
            .is_none_or(|line| line.trim() == "q")
        {
            break;
        }
        session.next_lesson()?;
    }
    Ok(())
}

async fn run_test(
    session: &mut NavigationSession,
    module_index: usize,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    session.select_test_link(Some(module_index));
    session.begin_test(module_index)?;

    while let Some(question) = session.current_question() {
        let number = session.current_question_index().map_or(1, |i| i + 1);
        println!("── Question {number} ──");
        print_styled(session);
        for (i, answer) in question.answers.iter().enumerate() {
            println!("  {i}) {answer}");
        }

        let Some(line) = prompt(input, "Your answer: ").await? else {
            break;
        };
        match line.trim().parse::<usize>() {
            Ok(choice) if session.score_question(choice) => println!("Correct!"),
            Ok(_) => println!("Not quite."),
            Err(_) => println!("Skipped."),
        }
        session.next_question()?;
    }

    if let Some(summary) = session.test_summary() {
        println!(
            "You got {} out of {} ({}%).",
            summary.score,
            summary.total,
            summary.percent()
        );
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    tracing::info!(
        bundle = %args.config.bundle_dir.display(),
        remote = args.config.remote.as_ref().map(|remote| remote.url.as_str()),
        "loading content"
    );
    let services = AppServices::bootstrap(&args.config, Clock::default_clock());
    let mut session = services.new_session();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let store = services.store();

    match args.command {
        Command::List => {
            print_status(&store.status());
            for (index, module) in store.modules().iter().enumerate() {
                print_module(index, module);
            }
        }
        Command::Lessons(index) => {
            await_module(&store, index).await;
            run_lessons(&mut session, index, &mut input).await?;
        }
        Command::Test(index) => {
            await_module(&store, index).await;
            run_test(&mut session, index, &mut input).await?;
        }
    }
    Ok(())
}

// Bundled modules are used right away; only an index past them waits on the
// remote feed, which is bounded by its request timeout.
async fn await_module(store: &ContentStore, index: usize) {
    if store.module(index).is_none() && store.status().remote.is_pending() {
        println!("waiting for remote modules...");
        store.wait_for_module(index).await;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
