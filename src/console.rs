//! Interactive console — reads lines from stdin, runs a screen command or
//! sends the line to the tutor, prints the result.
//!
//! Runs until the `shutdown` token is cancelled (Ctrl-C), `/quit`, or stdin
//! is closed. One-shot CLI subcommands go through the same [`execute`].

use chrono::{Local, NaiveDate, Timelike};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::error::AppError;
use crate::models::{Category, Domain, Priority};
use crate::render;
use crate::screens::DataSource;
use crate::screens::dashboard;
use crate::screens::deadlines::{DeadlineFilter, DeadlineSort, NewDeadline};
use crate::screens::recommendations::INTERESTS;

pub const HELP: &str = "\
commands:
  <text>                     ask the tutor
  /domain [tag]              show or set the chat domain
  /domains                   list tutoring domains
  /deadlines [filter] [sort] list deadlines (all|upcoming|overdue|completed, deadline|priority)
  /add title | YYYY-MM-DD [| priority [| category [| description]]]
  /done <id>                 toggle completion
  /rm <id>                   delete a deadline
  /analyze                   AI advice on your deadlines
  /progress [analyze]        statistics, achievements, trends
  /learn [all|domain|plan]   learning progress, or generate a plan
  /recommend [generate]      recommendations
  /interest [id]             list interests or toggle one
  /doubt question [| context]
  /dashboard                 overview
  /whoami                    current login
  /quit                      exit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    Help,
    Domain(Option<Domain>),
    Domains,
    Deadlines { filter: Option<DeadlineFilter>, sort: Option<DeadlineSort> },
    Add(NewDeadlineArgs),
    Done(u64),
    Remove(u64),
    Analyze,
    Progress { analyze: bool },
    Learn(LearnArg),
    Recommend { generate: bool },
    Interest(Option<String>),
    Doubt { question: String, context: Option<String> },
    Dashboard,
    WhoAmI,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LearnArg {
    Show,
    Focus(Option<Domain>),
    Plan,
}

/// `/add` fields before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeadlineArgs {
    pub title: String,
    pub due: String,
    pub priority: Priority,
    pub category: Category,
    pub description: String,
}

impl From<NewDeadlineArgs> for NewDeadline {
    fn from(a: NewDeadlineArgs) -> Self {
        NewDeadline {
            title: a.title,
            description: a.description,
            due: a.due,
            priority: a.priority,
            category: a.category,
        }
    }
}

fn parse_id(arg: &str) -> Result<u64, AppError> {
    arg.trim()
        .parse()
        .map_err(|_| AppError::Input(format!("expected a deadline id, got '{}'", arg.trim())))
}

fn pipe_fields(rest: &str) -> Vec<String> {
    rest.split('|').map(|f| f.trim().to_string()).collect()
}

pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let line = line.trim();
    let Some(body) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };
    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((n, r)) => (n, r.trim()),
        None => (body, ""),
    };

    let cmd = match name {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "domain" => Command::Domain((!rest.is_empty()).then(|| Domain::from_tag(rest))),
        "domains" => Command::Domains,
        "deadlines" => {
            let mut filter = None;
            let mut sort = None;
            for word in rest.split_whitespace() {
                if let Ok(f) = word.parse::<DeadlineFilter>() {
                    filter = Some(f);
                } else {
                    sort = Some(word.parse::<DeadlineSort>().map_err(AppError::Input)?);
                }
            }
            Command::Deadlines { filter, sort }
        }
        "add" => {
            let fields = pipe_fields(rest);
            let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
            if field(0).is_empty() || field(1).is_empty() {
                return Err(AppError::Input("usage: /add title | YYYY-MM-DD [| priority ...]".into()));
            }
            let priority = match field(2) {
                "" => Priority::default(),
                p => p.parse().map_err(AppError::Input)?,
            };
            let category = match field(3) {
                "" => Category::default(),
                c => c.parse().map_err(AppError::Input)?,
            };
            Command::Add(NewDeadlineArgs {
                title: field(0).to_string(),
                due: field(1).to_string(),
                priority,
                category,
                description: fields.get(4..).unwrap_or_default().join(" | "),
            })
        }
        "done" => Command::Done(parse_id(rest)?),
        "rm" => Command::Remove(parse_id(rest)?),
        "analyze" => Command::Analyze,
        "progress" => Command::Progress { analyze: rest == "analyze" },
        "learn" => Command::Learn(match rest {
            "" => LearnArg::Show,
            "plan" => LearnArg::Plan,
            "all" => LearnArg::Focus(None),
            tag => LearnArg::Focus(Some(Domain::from_tag(tag))),
        }),
        "recommend" => Command::Recommend { generate: rest == "generate" },
        "interest" => Command::Interest((!rest.is_empty()).then(|| rest.to_string())),
        "doubt" => {
            let fields = pipe_fields(rest);
            let question = fields.first().cloned().unwrap_or_default();
            if question.is_empty() {
                return Err(AppError::Input("usage: /doubt question [| context]".into()));
            }
            let context = fields.get(1).filter(|c| !c.is_empty()).cloned();
            Command::Doubt { question, context }
        }
        "dashboard" => Command::Dashboard,
        "whoami" => Command::WhoAmI,
        other => return Err(AppError::Input(format!("unknown command '/{other}' (try /help)"))),
    };
    Ok(cmd)
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Print(String),
    Quit,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run one command against the app and return its rendered output.
pub async fn execute(app: &mut App, cmd: Command) -> Result<Outcome, AppError> {
    let App { services, screens } = app;
    let ctx = services.ctx();

    let out = match cmd {
        Command::Quit => return Ok(Outcome::Quit),
        Command::Help => HELP.to_string(),

        Command::Chat(text) => match screens.chat.send(ctx.tutor, &text).await {
            Some(msg) => render::chat_message(msg),
            None => String::new(),
        },
        Command::Domain(None) => format!("chat domain: {}", screens.chat.domain().label()),
        Command::Domain(Some(domain)) => {
            let label = domain.label();
            screens.chat.set_domain(domain);
            format!("chat domain set to {label}")
        }
        Command::Domains => match ctx.api.domains().await {
            Ok(catalog) => catalog
                .domains
                .iter()
                .map(|(tag, info)| format!("{tag:<18} {}", info.description))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                debug!(error = %e, "domain catalog unavailable — listing built-ins");
                Domain::CHAT_CHOICES
                    .iter()
                    .map(|d| format!("{:<18} {}", d.tag(), d.label()))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        },

        Command::Deadlines { filter, sort } => {
            if screens.deadlines.source() == &DataSource::NotLoaded {
                screens.deadlines.load(&ctx).await?;
            }
            let filter = filter.unwrap_or(services.config.deadlines.default_filter);
            let sort = sort.unwrap_or(services.config.deadlines.default_sort);
            let today = today();
            let board = &screens.deadlines;
            format!(
                "{}{}",
                render::deadline_rows(&board.view(filter, sort, today), today, board.source()),
                render::deadline_stats(&board.stats(today))
            )
        }
        Command::Add(args) => match screens.deadlines.add(&ctx, args.into()).await? {
            Some(id) => format!("added deadline #{id} (local)"),
            None => "deadline created".to_string(),
        },
        Command::Done(id) => {
            if screens.deadlines.toggle_complete(id)? {
                format!("#{id} marked completed")
            } else {
                format!("#{id} marked pending")
            }
        }
        Command::Remove(id) => {
            let removed = screens.deadlines.delete(id)?;
            format!("removed #{id} {}", removed.title)
        }
        Command::Analyze => {
            if screens.deadlines.source() == &DataSource::NotLoaded {
                screens.deadlines.load(&ctx).await?;
            }
            render::suggestions(screens.deadlines.analyze(&ctx, today()).await?)
        }

        Command::Progress { analyze } => {
            let screen = &mut screens.progress;
            screen.load(&ctx).await?;
            if analyze {
                screen.analyze(&ctx).await?.to_string()
            } else {
                let mut out = String::new();
                if let Some(n) = screen.source().notice() {
                    out.push_str(&format!("  ({n})\n"));
                }
                let s = screen.stats();
                out.push_str(&format!(
                    "chats {}  domains {}  confidence {}\n",
                    s.total_chats,
                    s.domains.len(),
                    render::percent(s.avg_confidence)
                ));
                out.push_str(&render::trends(&screen.trends()));
                out.push('\n');
                out.push_str(&render::achievements(&screen.achievements()));
                out
            }
        }
        Command::Learn(arg) => {
            let screen = &mut screens.learning;
            match arg {
                LearnArg::Plan => render::learning_cards(screen.generate(&ctx).await?),
                LearnArg::Focus(focus) => {
                    screen.set_focus(focus);
                    screen.load(&ctx).await?;
                    render::domain_progress(&screen.domains(), screen.source())
                }
                LearnArg::Show => {
                    screen.load(&ctx).await?;
                    render::domain_progress(&screen.domains(), screen.source())
                }
            }
        }
        Command::Recommend { generate } => {
            let board = &mut screens.recommendations;
            if generate {
                board.generate(&ctx).await?;
            } else {
                board.load(&ctx, &Domain::General).await?;
            }
            render::recommendations(board.items(), board.source())
        }
        Command::Interest(None) => {
            let selected = screens.recommendations.selected_interests();
            INTERESTS
                .iter()
                .map(|i| {
                    let mark = if selected.contains(&i.id) { "x" } else { " " };
                    format!("[{mark}] {:<20} {}", i.id, i.label)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::Interest(Some(id)) => {
            if screens.recommendations.toggle_interest(&id)? {
                format!("added interest {id}")
            } else {
                format!("removed interest {id}")
            }
        }
        Command::Doubt { question, context } => {
            let domain = match screens.chat.domain() {
                Domain::Auto => Domain::General,
                other => other.clone(),
            };
            let res = screens.doubts.resolve(&ctx, &question, context.as_deref(), domain).await?;
            render::resolution(res)
        }
        Command::Dashboard => {
            screens.dashboard.load(&ctx).await?;
            let name = services.user().and_then(|u| u.first_name()).unwrap_or("there");
            render::dashboard(
                dashboard::greeting(Local::now().hour()),
                name,
                &screens.dashboard.stat_cards(),
                screens.dashboard.source(),
            )
        }
        Command::WhoAmI => match services.session() {
            Some(s) => format!(
                "{} <{}> (logged in {})",
                s.user.full_name,
                s.user.email,
                s.saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ),
            None => "not logged in".to_string(),
        },
    };
    Ok(Outcome::Print(out))
}

/// Interactive loop. Command errors are printed and the loop continues.
pub async fn run(app: &mut App, shutdown: CancellationToken) -> Result<(), AppError> {
    info!("console started");
    println!("─────────────────────────────────");
    println!(" {}  (/help, Ctrl-C to quit)", app.services.config.app_name);
    println!("─────────────────────────────────");
    for msg in app.screens.chat.messages() {
        println!("{}", render::chat_message(msg));
    }

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("stdin read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        let input = input.trim();
                        if input.is_empty() { continue; }
                        debug!(input = %input, "console received line");

                        let result = match parse_command(input) {
                            Ok(cmd) => execute(app, cmd).await,
                            Err(e) => Err(e),
                        };
                        match result {
                            Ok(Outcome::Quit) => break,
                            Ok(Outcome::Print(text)) => {
                                if !text.is_empty() { println!("{}", text.trim_end()); }
                            }
                            Err(e) => println!("error: {e}"),
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_command("  hi there ").unwrap(), Command::Chat("hi there".into()));
    }

    #[test]
    fn parses_deadline_commands() {
        assert_eq!(
            parse_command("/deadlines overdue priority").unwrap(),
            Command::Deadlines {
                filter: Some(DeadlineFilter::Overdue),
                sort: Some(DeadlineSort::Priority)
            }
        );
        assert!(parse_command("/deadlines sideways").is_err());
        assert_eq!(parse_command("/done 3").unwrap(), Command::Done(3));
        assert!(parse_command("/rm three").is_err());
    }

    #[test]
    fn parses_add_fields() {
        let cmd = parse_command("/add Essay | 2025-09-01 | high | exam | draft | outline").unwrap();
        let Command::Add(args) = cmd else { panic!("expected add") };
        assert_eq!(args.title, "Essay");
        assert_eq!(args.priority, Priority::High);
        assert_eq!(args.category, Category::Exam);
        assert_eq!(args.description, "draft | outline");

        let Command::Add(args) = parse_command("/add Essay | 2025-09-01").unwrap() else {
            panic!("expected add")
        };
        assert_eq!(args.priority, Priority::Medium);
        assert!(parse_command("/add Essay").is_err());
        assert!(parse_command("/add Essay | 2025-09-01 | urgent").is_err());
    }

    #[test]
    fn parses_misc_commands() {
        assert_eq!(
            parse_command("/domain data_science").unwrap(),
            Command::Domain(Some(Domain::DataScience))
        );
        assert_eq!(parse_command("/learn plan").unwrap(), Command::Learn(LearnArg::Plan));
        assert_eq!(parse_command("/learn all").unwrap(), Command::Learn(LearnArg::Focus(None)));
        assert_eq!(
            parse_command("/doubt What is a monad? | week 4").unwrap(),
            Command::Doubt { question: "What is a monad?".into(), context: Some("week 4".into()) }
        );
        assert!(parse_command("/doubt").is_err());
        assert!(parse_command("/bogus").is_err());
    }

    #[tokio::test]
    async fn offline_session_runs_each_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Config::test_default(dir.path())).unwrap();

        let Outcome::Print(out) = execute(&mut app, Command::Chat("hello".into())).await.unwrap()
        else {
            panic!("expected output")
        };
        assert!(out.contains("[echo] hello"));

        let cmd = Command::Deadlines { filter: None, sort: None };
        let Outcome::Print(out) = execute(&mut app, cmd).await.unwrap() else { panic!() };
        assert!(out.contains("sample data"));
        assert!(out.contains("Data Science Assignment"));

        execute(&mut app, Command::Done(1)).await.unwrap();
        assert!(app.screens.deadlines.items()[0].is_completed);

        let Outcome::Print(out) = execute(&mut app, Command::Dashboard).await.unwrap() else {
            panic!()
        };
        assert!(out.contains("Total Chats"));

        assert_eq!(execute(&mut app, Command::Quit).await.unwrap(), Outcome::Quit);
    }

    #[tokio::test]
    async fn add_before_listing_keeps_sample_deadlines() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Config::test_default(dir.path())).unwrap();

        let add = parse_command("/add Essay | 2030-01-01").unwrap();
        let Outcome::Print(out) = execute(&mut app, add).await.unwrap() else { panic!() };
        assert!(out.contains("#3"), "got: {out}");

        let cmd = Command::Deadlines { filter: None, sort: None };
        let Outcome::Print(out) = execute(&mut app, cmd).await.unwrap() else { panic!() };
        assert!(out.contains("sample data"));
        assert!(out.contains("Data Science Assignment"));
        assert!(out.contains("Essay"));
    }
}
