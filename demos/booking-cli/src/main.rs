use std::path::PathBuf;
use std::process::ExitCode;

use ccd_booking::prelude::*;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

type Boot = Bootstrapper<ReqwestTransport, FileCookieStore>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("could not read {}: {source}", .path.display())]
    ReadEvent {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid event JSON: {0}")]
    InvalidEvent(#[from] serde_json::Error),
    #[error("not logged in; pass --username and --password")]
    NotLoggedIn,
    #[error("{0}")]
    Bootstrap(String),
}

#[derive(Parser, Debug)]
#[command(name = "ccd-booking", about = "CCD booking site client")]
struct Cli {
    /// API origin. Falls back to CCD_API_PROTOCOL / CCD_API_HOST.
    #[arg(long, env = "CCD_API_URL")]
    api_url: Option<String>,

    /// Origin sent in the identity headers. Defaults to the API origin.
    #[arg(long, env = "CCD_APP_URL")]
    app_url: Option<String>,

    /// Where the login cookie and the server's session cookie are persisted.
    #[arg(long, env = "CCD_COOKIE_FILE", default_value = "ccd_cookies.json")]
    cookie_file: PathBuf,

    /// Used to log in when no persisted session is valid.
    #[arg(long, env = "CCD_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "CCD_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the persisted session is still valid.
    Status,
    /// Log in and persist the session.
    Login,
    /// Log out and forget the session.
    Logout,
    /// Print the site's main menu.
    Menu,
    /// List the talent options of the booking form.
    FormData,
    /// Submit an event read from a JSON file.
    CreateEvent { file: PathBuf },
}

impl Cli {
    fn config(&self) -> Result<ClientConfig, BookingError> {
        match &self.api_url {
            Some(api_url) => Ok(ClientConfig::new(
                api_url.as_str(),
                self.app_url.as_deref().unwrap_or(api_url.as_str()),
            )),
            None => ClientConfig::from_env(),
        }
    }

    fn credentials(&self) -> Option<LoginCredentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                Some(LoginCredentials::new(user.as_str(), pass.as_str()))
            }
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config()?;
    let credentials = cli.credentials();
    let transport = ReqwestTransport::new([&config.api_url, &config.app_url])?;
    let store = FileCookieStore::new(&cli.cookie_file);
    let mut boot = Bootstrapper::new(ApiClient::new(transport, config), store);

    let state = boot.mount().await;
    if let Some(message) = state.message() {
        return Err(CliError::Bootstrap(message));
    }

    match cli.command {
        Command::Status => {
            println!("{state}");
            print_session(&boot);
        }
        Command::Login => {
            let credentials = credentials.ok_or(CliError::NotLoggedIn)?;
            login(&mut boot, &credentials).await?;
            print_session(&boot);
        }
        Command::Logout => {
            let state = boot.logout().await?;
            println!("{state}");
        }
        Command::Menu => {
            let outcome = boot.api().fetch_main_menu().await;
            if let Some(message) = outcome.error_message() {
                return Err(CliError::Bootstrap(message));
            }
            for root in outcome.data.unwrap_or_default() {
                root.walk(&mut |depth, item| {
                    let indent = depth * 2;
                    println!("{:indent$}{} ({})", "", item.title, item.uri);
                });
            }
        }
        Command::FormData => {
            ensure_session(&mut boot, credentials).await?;
            let booking = boot.booking().ok_or(CliError::NotLoggedIn)?;
            let outcome = booking.form_data().await;
            if let Some(message) = outcome.error_message() {
                return Err(CliError::Bootstrap(message));
            }
            let data = outcome.data.unwrap_or_default();
            for kind in TalentKind::ALL {
                println!("{kind}:");
                for (id, option) in data.options(kind) {
                    println!("  {id}: {}", option.name);
                }
            }
        }
        Command::CreateEvent { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .map_err(|source| CliError::ReadEvent {
                    path: file.clone(),
                    source,
                })?;
            let event: EventSubmission = serde_json::from_str(&raw)?;
            ensure_session(&mut boot, credentials).await?;
            let booking = boot.booking().ok_or(CliError::NotLoggedIn)?;
            let outcome = booking.create_event(&event).await;
            println!("{}", outcome.message());
        }
    }
    Ok(())
}

async fn login(boot: &mut Boot, credentials: &LoginCredentials) -> Result<(), CliError> {
    match boot.login(credentials).await {
        Ok(session) => {
            tracing::debug!(uid = session.uid, "logged in");
            Ok(())
        }
        Err(BookingError::Login(e)) => {
            eprintln!("{}", e.user_message());
            Err(BookingError::Login(e).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn ensure_session(
    boot: &mut Boot,
    credentials: Option<LoginCredentials>,
) -> Result<(), CliError> {
    if boot.state() == BootstrapState::Authenticated {
        return Ok(());
    }
    match credentials {
        Some(credentials) => login(boot, &credentials).await,
        None => Err(CliError::NotLoggedIn),
    }
}

fn print_session(boot: &Boot) {
    let snap = boot.reader().snapshot();
    if let Some(uid) = snap.uid {
        let roles = snap.roles.unwrap_or_default().join(", ");
        println!("uid {uid}, roles: {roles}");
    }
}
