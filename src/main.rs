//! mentor-dash — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once (to the log file for the interactive shell)
//!   6. Build services and screens
//!   7. Run one subcommand, or the console until Ctrl-C / `/quit`

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use mentor_dash::app::App;
use mentor_dash::auth::RegistrationForm;
use mentor_dash::console::{self, Command, LearnArg, NewDeadlineArgs, Outcome};
use mentor_dash::error::AppError;
use mentor_dash::models::{Category, Domain, Priority};
use mentor_dash::screens::deadlines::{DeadlineFilter, DeadlineSort};
use mentor_dash::{config, logger};

#[derive(Parser, Debug)]
#[command(name = "mentor-dash", version, about = "Student learning dashboard in the terminal")]
struct Cli {
    /// Config file (defaults to config/default.toml)
    #[arg(short = 'f', long = "config", global = true)]
    config: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Log in and store the session token
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and store the session token
    Register {
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        student_id: String,
        #[arg(long, default_value = "")]
        course: String,
        #[arg(long)]
        semester: Option<u32>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the current login
    Whoami {
        /// Refetch the profile from the server
        #[arg(long)]
        refresh: bool,
    },
    /// Ask the tutor one question
    Chat {
        #[arg(required = true)]
        message: Vec<String>,
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// List deadlines
    Deadlines {
        #[arg(long)]
        filter: Option<DeadlineFilter>,
        #[arg(long)]
        sort: Option<DeadlineSort>,
        /// Ask the tutor for advice on the list
        #[arg(long)]
        analyze: bool,
    },
    /// Create a deadline
    AddDeadline {
        title: String,
        /// Due date, YYYY-MM-DD
        due: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long, default_value = "assignment")]
        category: Category,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Statistics, achievements and trends
    Progress {
        #[arg(long)]
        analyze: bool,
    },
    /// Per-domain learning progress, or an AI learning plan
    Learning {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        plan: bool,
    },
    /// Learning recommendations
    Recommend {
        /// Generate new recommendations with the tutor
        #[arg(long)]
        generate: bool,
    },
    /// Ask for a detailed explanation of a doubt
    Doubt {
        question: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(short, long, default_value = "general")]
        domain: String,
    },
    /// Overview of your activity
    Dashboard,
    /// List tutoring domains
    Domains,
    /// Interactive console (default)
    Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    let cli_level = logger::level_for_verbosity(cli.verbose);
    let effective_level = cli_level.unwrap_or(config.log_level.as_str());
    logger::parse_level(effective_level)?;

    let interactive = matches!(cli.command, None | Some(Cmd::Shell));
    let log_file = if interactive { config.log_file.as_deref() } else { None };
    logger::init(effective_level, cli_level.is_some(), log_file)?;

    info!(
        app = %config.app_name,
        work_dir = %config.work_dir.display(),
        api = %config.api.base_url,
        tutor = %config.tutor.backend,
        effective_log_level = %effective_level,
        "config loaded"
    );

    let mut app = App::new(config)?;

    let command = match cli.command.unwrap_or(Cmd::Shell) {
        Cmd::Shell => return shell(&mut app).await,
        Cmd::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let session = app.services.login(&email, &password).await?;
            println!("logged in as {} <{}>", session.user.full_name, session.user.email);
            return Ok(());
        }
        Cmd::Register { email, full_name, student_id, course, semester, password } => {
            let form = RegistrationForm {
                email,
                password: password_or_prompt(password)?,
                full_name,
                student_id,
                course,
                semester,
            };
            let session = app.services.register(&form).await?;
            println!("registered {} <{}>", session.user.full_name, session.user.email);
            return Ok(());
        }
        Cmd::Logout => {
            if app.services.logout()? {
                println!("logged out");
            } else {
                println!("not logged in");
            }
            return Ok(());
        }
        Cmd::Whoami { refresh } => {
            if refresh {
                app.services.refresh_profile().await?;
            }
            Command::WhoAmI
        }
        Cmd::Chat { message, domain } => {
            if let Some(tag) = domain {
                app.screens.chat.set_domain(Domain::from_tag(&tag));
            }
            Command::Chat(message.join(" "))
        }
        Cmd::Deadlines { filter, sort, analyze } => {
            if analyze {
                Command::Analyze
            } else {
                Command::Deadlines { filter, sort }
            }
        }
        Cmd::AddDeadline { title, due, priority, category, description } => {
            Command::Add(NewDeadlineArgs { title, due, priority, category, description })
        }
        Cmd::Progress { analyze } => Command::Progress { analyze },
        Cmd::Learning { domain, plan } => {
            let focus = domain
                .filter(|d| d != "all")
                .map(|d| Domain::from_tag(&d));
            app.screens.learning.set_focus(focus);
            Command::Learn(if plan { LearnArg::Plan } else { LearnArg::Show })
        }
        Cmd::Recommend { generate } => Command::Recommend { generate },
        Cmd::Doubt { question, context, domain } => {
            app.screens.chat.set_domain(Domain::from_tag(&domain));
            Command::Doubt { question, context }
        }
        Cmd::Dashboard => Command::Dashboard,
        Cmd::Domains => Command::Domains,
    };

    if let Outcome::Print(text) = console::execute(&mut app, command).await? {
        println!("{}", text.trim_end());
    }
    Ok(())
}

async fn shell(app: &mut App) -> Result<(), AppError> {
    // Ctrl-C cancels the token so the console loop exits.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — shutting down");
            ctrlc_token.cancel();
        }
    });
    console::run(app, shutdown).await
}

fn password_or_prompt(password: Option<String>) -> Result<String, AppError> {
    if let Some(p) = password {
        return Ok(p);
    }
    print!("password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
