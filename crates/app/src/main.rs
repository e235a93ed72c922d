use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, AssessmentApi, HttpAssessmentApi};
use edunex_core::model::{ParseIdError, QuizId, UserId};
use edunex_core::time::format_remaining;
use services::{
    AttemptSession, AttemptTicker, AttemptWorkflow, Clock, SubmitMode, SubmitOutcome, TickOutcome,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidId(ParseIdError),
    MissingQuizId,
    MissingStudentId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidId(err) => write!(f, "{err}"),
            ArgsError::MissingQuizId => write!(f, "take requires --quiz-id (or EDUNEX_QUIZ_ID)"),
            ArgsError::MissingStudentId => {
                write!(f, "list requires --student-id (or EDUNEX_STUDENT_ID)")
            }
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
    eprintln!("  edunex-attempt take [--quiz-id <id>] [--base-url <url>] [--token <jwt>]");
    eprintln!("                      [--username <name> --password <pass>]");
    eprintln!("  edunex-attempt list [--student-id <id>] [--base-url <url>] [--token <jwt>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EDUNEX_API_URL (default http://localhost:8080/api)");
    eprintln!("  EDUNEX_API_TOKEN, EDUNEX_QUIZ_ID, EDUNEX_STUDENT_ID");
    eprintln!();
    eprintln!("In-attempt commands:");
    eprintln!("  answer <text>   record an answer for the current question");
    eprintln!("  next / prev     move between questions");
    eprintln!("  goto <n>        jump to question n (1-based)");
    eprintln!("  status          show progress and remaining time");
    eprintln!("  submit          submit the attempt");
    eprintln!("  quit            abandon the attempt (answers are discarded)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Take,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "take" => Some(Self::Take),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    config: ApiConfig,
    quiz_id: Option<QuizId>,
    student_id: Option<UserId>,
    username: Option<String>,
    password: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = ApiConfig::from_env();
        let mut quiz_id = std::env::var("EDUNEX_QUIZ_ID")
            .ok()
            .and_then(|value| value.parse::<QuizId>().ok());
        let mut student_id = std::env::var("EDUNEX_STUDENT_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut username = None;
        let mut password = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    config.base_url = require_value(args, "--base-url")?;
                }
                "--token" => {
                    config.token = Some(require_value(args, "--token")?);
                }
                "--quiz-id" => {
                    quiz_id = Some(
                        require_value(args, "--quiz-id")?
                            .parse()
                            .map_err(ArgsError::InvalidId)?,
                    );
                }
                "--student-id" => {
                    student_id = Some(
                        require_value(args, "--student-id")?
                            .parse()
                            .map_err(ArgsError::InvalidId)?,
                    );
                }
                "--username" => {
                    username = Some(require_value(args, "--username")?);
                }
                "--password" => {
                    password = Some(require_value(args, "--password")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config,
            quiz_id,
            student_id,
            username,
            password,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Take,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Take,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut http = HttpAssessmentApi::new(parsed.config.clone());
    if parsed.config.token.is_none() {
        if let (Some(username), Some(password)) = (&parsed.username, &parsed.password) {
            let auth = http.login(username.clone(), password.clone()).await?;
            if let Some(name) = auth.full_name.or(auth.username) {
                println!("Signed in as {name}.");
            }
        }
    }

    let client: Arc<dyn AssessmentApi> = Arc::new(http);

    match cmd {
        Command::List => {
            let student_id = parsed.student_id.ok_or(ArgsError::MissingStudentId)?;
            let listing = client.student_quizzes(student_id).await?;
            if listing.is_empty() {
                println!("No quizzes available.");
                return Ok(());
            }
            println!("Available quizzes:");
            for quiz in listing {
                println!(
                    "  [{}] {} — {} ({} min, {} pts)",
                    quiz.id, quiz.title, quiz.course_name, quiz.duration_minutes, quiz.total_points
                );
            }
            Ok(())
        }
        Command::Take => {
            let quiz_id = parsed.quiz_id.ok_or(ArgsError::MissingQuizId)?;
            let workflow = AttemptWorkflow::new(Clock::default_clock(), client);
            run_attempt(&workflow, quiz_id).await
        }
    }
}

fn print_question(session: &AttemptSession) {
    let question = session.current_question();
    let progress = session.progress();
    println!();
    println!(
        "Question {} of {} ({} pts) — {} — {} remaining",
        progress.current_index + 1,
        progress.total,
        question.points(),
        question.kind(),
        format_remaining(progress.remaining_seconds),
    );
    println!("  {}", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        println!("    {}. {option}", i + 1);
    }
    match session.answers().get(question.id()) {
        Some("") | None => println!("  (unanswered)"),
        Some(current) => println!("  current answer: {current}"),
    }
}

fn print_status(session: &AttemptSession) {
    let progress = session.progress();
    println!(
        "{} of {} answered, {} remaining",
        progress.answered,
        progress.total,
        format_remaining(progress.remaining_seconds),
    );
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> std::io::Result<bool> {
    println!("{prompt} [y/N]");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn run_attempt(
    workflow: &AttemptWorkflow,
    quiz_id: QuizId,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = workflow.start_attempt(quiz_id).await?;
    println!(
        "{} — {} ({} questions, {} minutes)",
        session.quiz().title(),
        session.quiz().course_name(),
        session.quiz().question_count(),
        session.quiz().duration_minutes(),
    );
    println!("Type 'help' for commands.");
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (mut ticker, mut ticks) = AttemptTicker::start();

    loop {
        tokio::select! {
            _ = ticks.recv() => match session.tick() {
                TickOutcome::LowTime => {
                    println!("\n5 minutes remaining!");
                }
                TickOutcome::Expired => {
                    ticker.stop();
                    println!("\nTime's up! Submitting your quiz automatically.");
                    match workflow.submit(&mut session, SubmitMode::Automatic).await {
                        Ok(_) => println!("Quiz submitted."),
                        // Best-effort on timeout: report only, never retry.
                        Err(err) => eprintln!("Failed to submit quiz: {err}"),
                    }
                    return Ok(());
                }
                TickOutcome::Ticking | TickOutcome::Halted => {}
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // EOF behaves like quit: discard the session.
                    ticker.stop();
                    return Ok(());
                };
                let line = line.trim();
                let (command, rest) = match line.split_once(' ') {
                    Some((head, tail)) => (head, tail.trim()),
                    None => (line, ""),
                };

                match command {
                    "" => {}
                    "help" => print_usage(),
                    "status" => print_status(&session),
                    "next" => {
                        session.next();
                        print_question(&session);
                    }
                    "prev" => {
                        session.previous();
                        print_question(&session);
                    }
                    "goto" => match rest.parse::<usize>() {
                        Ok(n) if n >= 1 => {
                            session.go_to(n - 1);
                            print_question(&session);
                        }
                        _ => println!("goto expects a question number"),
                    },
                    "answer" => {
                        let question_id = session.current_question().id();
                        if session.set_answer(question_id, rest) {
                            print_status(&session);
                        } else {
                            println!("The attempt is already submitted.");
                        }
                    }
                    "submit" => {
                        let unanswered = session.answers().unanswered_count();
                        if unanswered > 0 {
                            let prompt = format!(
                                "You have {unanswered} unanswered question(s). Submit anyway?"
                            );
                            if !confirm(&mut lines, &prompt).await? {
                                continue;
                            }
                        }
                        match workflow.submit(&mut session, SubmitMode::Manual).await {
                            Ok(SubmitOutcome::Submitted | SubmitOutcome::AlreadySubmitted) => {
                                ticker.stop();
                                println!("Quiz submitted successfully!");
                                return Ok(());
                            }
                            Err(err) => {
                                // Manual failure is retryable; the countdown resumes.
                                eprintln!("Failed to submit quiz: {err}. Try again.");
                            }
                        }
                    }
                    "quit" => {
                        // No abandon signal is sent; the server treats an
                        // unsubmitted attempt as absent.
                        ticker.stop();
                        println!("Attempt discarded.");
                        return Ok(());
                    }
                    other => println!("unknown command: {other} (try 'help')"),
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
