use std::sync::Arc;

use clap::{Parser, Subcommand};
use portal::api::{AuthApi, HttpApi, Resource};
use portal::chatbot::{Chatbot, Conversation};
use portal::config::PortalConfig;
use portal::routes::{Navigation, RouteTable};
use portal::session::SessionStore;
use portal::storage::{FileStorage, HintStorage, SessionMirror};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] portal::ConfigError),
    #[error("{}", .0.user_message())]
    Api(#[from] portal::ApiError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Reseller portal session CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: check, login, navigate, list records.
    Shell,
    /// Ask the service chatbot a single question.
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Print the persisted session hint, if any.
    Hint,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = PortalConfig::from_env()?;

    match cli.command {
        Command::Shell => run_shell(&config).await,
        Command::Chat { message } => {
            println!("{}", Chatbot::default().reply(&message.join(" ")).text);
            Ok(())
        }
        Command::Hint => {
            let storage: Arc<dyn HintStorage> = Arc::new(FileStorage::new(&config.storage_dir));
            print_hint(SessionMirror::new(storage, config.storage_key.as_str()).read())
        }
    }
}

// =============================================================================
// SHELL
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Login { email: String, password: String },
    Logout,
    Check,
    Whoami,
    Hint,
    Go(String),
    List(String),
    Chat(String),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

const HELP: &str = "\
commands:
  login <email> <password>   sign in
  logout                     sign out
  check                      re-run the session check
  whoami                     show the current session
  hint                       show the persisted session hint
  go <path>                  navigate, applying route guards
  list <resource>            list dashboard records
  chat <text>                ask the service chatbot
  help                       show this help
  quit                       leave the shell";

fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match head {
        "" => ShellCommand::Empty,
        "login" => match rest.split_once(char::is_whitespace) {
            Some((email, password)) if !password.trim().is_empty() => ShellCommand::Login {
                email: email.to_owned(),
                password: password.trim().to_owned(),
            },
            _ => ShellCommand::Invalid("usage: login <email> <password>".to_owned()),
        },
        "logout" => ShellCommand::Logout,
        "check" => ShellCommand::Check,
        "whoami" => ShellCommand::Whoami,
        "hint" => ShellCommand::Hint,
        "go" if !rest.is_empty() => ShellCommand::Go(rest.to_owned()),
        "go" => ShellCommand::Invalid("usage: go <path>".to_owned()),
        "list" if !rest.is_empty() => ShellCommand::List(rest.to_owned()),
        "list" => ShellCommand::Invalid("usage: list <resource>".to_owned()),
        "chat" => ShellCommand::Chat(rest.to_owned()),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command `{other}`; try `help`")),
    }
}

async fn run_shell(config: &PortalConfig) -> Result<(), CliError> {
    let http = Arc::new(HttpApi::from_config(config)?);
    let api: Arc<dyn AuthApi> = http.clone();
    let storage: Arc<dyn HintStorage> = Arc::new(FileStorage::new(&config.storage_dir));
    let store = SessionStore::new(api, storage, config.storage_key.as_str());
    let routes = RouteTable::portal();
    let mut conversation = Conversation::default();

    print_session(&store.check_auth().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"portal> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Login { email, password } => match store.login(&email, &password).await {
                Ok(user) => println!("signed in as {} ({})", user.email, user.role),
                Err(e) => println!("{}", e.user_message()),
            },
            ShellCommand::Logout => {
                store.logout().await;
                println!("signed out");
            }
            ShellCommand::Check => print_session(&store.check_auth().await),
            ShellCommand::Whoami => print_session(&store.snapshot()),
            ShellCommand::Hint => print_hint(store.hint())?,
            ShellCommand::Go(path) => match routes.navigate(&path, &store.settled().await) {
                Navigation::Pending => println!("loading…"),
                Navigation::Render(path) => println!("render {path}"),
                Navigation::Redirect(to) => println!("redirect -> {to}"),
            },
            ShellCommand::List(name) => match name.parse::<Resource>() {
                Ok(resource) => match http.list_records(resource).await {
                    Ok(records) => print_json(&Value::Array(records))?,
                    Err(e) => println!("{}", e.user_message()),
                },
                Err(e) => println!("{e}"),
            },
            ShellCommand::Chat(text) => println!("{}", conversation.send(&text).text),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::Invalid(message) => println!("{message}"),
        }
    }
    Ok(())
}

fn print_session(state: &portal::SessionState) {
    match &state.current_user {
        Some(user) => println!("signed in as {} ({}, id {})", user.email, user.role, user.id),
        None if state.is_loading_auth => println!("checking session…"),
        None => println!("not signed in"),
    }
}

fn print_hint(hint: Option<portal::PersistedSession>) -> Result<(), CliError> {
    match hint {
        Some(blob) => print_json(&serde_json::to_value(blob)?),
        None => {
            println!("no session hint");
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
