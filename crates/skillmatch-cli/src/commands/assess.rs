//! The `skillmatch assess` command — the proctored session front-end.
//!
//! Runs the assessment interactively over stdin, or replays a
//! line-oriented event script. Script lines use the same commands as the
//! interactive prompt and may interleave environment signals, which is
//! how host integrations and the e2e tests deliver proctoring events.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tokio::io::AsyncBufReadExt;

use skillmatch_core::detector::EnvironmentSignal;
use skillmatch_core::engine::{
    AssessmentEngine, EngineConfig, NoopFullscreen, SessionObserver,
};
use skillmatch_core::report::AssessmentReport;
use skillmatch_core::session::{Phase, SessionSnapshot, ViolationKind};
use skillmatch_providers::config::load_config_from;

use super::{output_dir, provider_from_config};

/// Console observer mirroring the proctoring notifications.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_warning(&self, kind: ViolationKind, count: u32, limit: u32) {
        println!(
            "WARNING: {kind} detected. Violations: {count}/{limit}. \
             Next violation will terminate the test."
        );
    }

    fn on_terminated(&self, _report: &AssessmentReport) {
        println!("CRITICAL VIOLATION: violation limit reached. Test terminated with zero score.");
    }

    fn on_completed(&self, _report: &AssessmentReport) {}
}

/// One line of user or script input.
enum SessionCommand {
    Answer(usize),
    Next,
    Prev,
    Submit,
    Signal(EnvironmentSignal),
    Quit,
}

/// Parse an input line. Blank lines and `#` comments yield `None`.
fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let lower = line.to_lowercase();
    let mut parts = lower.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let rest = parts.next();

    let command = match (head, rest) {
        ("next", None) | ("n", None) => SessionCommand::Next,
        ("prev", None) | ("previous", None) | ("p", None) => SessionCommand::Prev,
        ("submit", None) => SessionCommand::Submit,
        ("quit", None) | ("q", None) => SessionCommand::Quit,
        ("signal", Some(signal)) => SessionCommand::Signal(
            signal
                .parse::<EnvironmentSignal>()
                .map_err(|e| anyhow::anyhow!("bad signal: {e}"))?,
        ),
        ("answer", Some(choice)) => SessionCommand::Answer(parse_choice(choice)?),
        (choice, None) if choice.len() == 1 && choice.chars().all(|c| c.is_ascii_alphabetic()) => {
            SessionCommand::Answer(parse_choice(choice)?)
        }
        _ => anyhow::bail!("unrecognized command: '{line}'"),
    };
    Ok(Some(command))
}

/// Map an option letter ("a", "b", ...) to its zero-based index.
fn parse_choice(choice: &str) -> Result<usize> {
    let c = choice
        .chars()
        .next()
        .filter(|c| c.is_ascii_lowercase())
        .with_context(|| format!("bad answer choice: '{choice}'"))?;
    Ok((c as u8 - b'a') as usize)
}

/// Apply one command. Returns `true` when the operator quit.
fn apply(
    engine: &mut AssessmentEngine,
    observer: &dyn SessionObserver,
    command: SessionCommand,
) -> bool {
    match command {
        SessionCommand::Answer(option) => engine.select_answer(option),
        SessionCommand::Next => engine.navigate(1),
        SessionCommand::Prev => engine.navigate(-1),
        SessionCommand::Submit => engine.submit(observer),
        SessionCommand::Signal(signal) => engine.handle_signal(signal, observer),
        SessionCommand::Quit => return true,
    }
    false
}

fn render_question(snapshot: &SessionSnapshot, remaining: Option<Duration>) {
    let Some(question) = &snapshot.current_question else {
        return;
    };
    let clock = remaining
        .map(|r| format!("{:02}:{:02}", r.as_secs() / 60, r.as_secs() % 60))
        .unwrap_or_else(|| "--:--".into());
    println!();
    println!(
        "{} Validation — Question {} of {}   [{} violations | {} left]",
        snapshot.domain,
        snapshot.cursor + 1,
        snapshot.question_count,
        snapshot.violation_count,
        clock
    );
    println!("[{}] {}", question.difficulty, question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if snapshot.answers[snapshot.cursor] == Some(i) {
            ">"
        } else {
            " "
        };
        println!("  {marker} {}. {option}", (b'A' + i as u8) as char);
    }
    println!("(answer <a-d> | next | prev | submit)");
}

fn print_result(report: &AssessmentReport) {
    let mut table = Table::new();
    table.set_header(vec![
        "Domain",
        "Outcome",
        "Score",
        "Answered",
        "Correct",
        "Violations",
    ]);
    table.add_row(vec![
        Cell::new(&report.domain),
        Cell::new(report.outcome.to_string()),
        Cell::new(format!("{}%", report.score)),
        Cell::new(format!("{}/{}", report.answered_count, report.question_count)),
        Cell::new(report.correct_count.to_string()),
        Cell::new(report.violations.len().to_string()),
    ]);
    println!("\n{table}");
    print!("{}", report.summary());
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    domain: String,
    script: Option<PathBuf>,
    questions: Option<u32>,
    time_limit: Option<u64>,
    output: Option<PathBuf>,
    provider_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = Arc::new(provider_from_config(&config, provider_name.as_deref())?);

    let engine_config = EngineConfig {
        question_count: questions.unwrap_or(config.question_count),
        time_limit: Duration::from_secs(time_limit.unwrap_or(config.time_limit_secs)),
    };
    anyhow::ensure!(
        engine_config.question_count >= 1,
        "question count must be at least 1"
    );

    let mut engine =
        AssessmentEngine::new(provider, Arc::new(NoopFullscreen), engine_config);
    let observer = ConsoleObserver;

    println!("Generating {domain} assessment...");
    engine
        .choose_domain(&domain)
        .await
        .context("failed to generate test")?;

    let abandoned = match script {
        Some(path) => run_script(&mut engine, &observer, &path)?,
        None => run_interactive(&mut engine, &observer).await?,
    };
    if abandoned {
        println!("Assessment abandoned.");
        return Ok(());
    }

    let report = engine
        .last_report()
        .cloned()
        .context("session ended without a report")?;
    print_result(&report);

    let dir = output_dir(&config, output);
    std::fs::create_dir_all(&dir)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = dir.join(format!("assessment-{timestamp}.json"));
    report.save_json(&path)?;
    println!("Report saved to: {}", path.display());

    engine.acknowledge();
    Ok(())
}

/// Replay a script file. The script must end the session (submit or
/// termination); anything else is a harness bug.
fn run_script(
    engine: &mut AssessmentEngine,
    observer: &dyn SessionObserver,
    path: &PathBuf,
) -> Result<bool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    for (lineno, line) in content.lines().enumerate() {
        let Some(command) = parse_command(line)
            .with_context(|| format!("script line {}", lineno + 1))?
        else {
            continue;
        };
        if apply(engine, observer, command) {
            return Ok(true);
        }
        // lines after a terminal transition replay as no-ops
    }
    anyhow::ensure!(
        matches!(engine.phase(), Phase::Completed | Phase::Terminated),
        "script ended while the session was still in progress"
    );
    Ok(false)
}

/// Interactive stdin loop, racing user input against the session timer.
async fn run_interactive(
    engine: &mut AssessmentEngine,
    observer: &dyn SessionObserver,
) -> Result<bool> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        if matches!(engine.phase(), Phase::Completed | Phase::Terminated) {
            return Ok(false);
        }
        render_question(&engine.snapshot(), engine.time_remaining(Instant::now()));

        let deadline = engine.timer_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed mid-session
                    return Ok(true);
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if apply(engine, observer, command) {
                            return Ok(true);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e:#}"),
                }
            }
            _ = async {
                tokio::time::sleep_until(tokio::time::Instant::from_std(
                    deadline.expect("guarded by condition"),
                ))
                .await
            }, if deadline.is_some() => {
                if let Some(id) = engine.session_id() {
                    engine.handle_timer_expiry(id, Instant::now(), observer);
                }
            }
        }
    }
}
