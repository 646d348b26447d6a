//! `lost-found` command line client

mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use app_core::{
    LoginScreen, MainScreen, ObjectDetailScreen, ObjectManageScreen, ProfileScreen,
    RegisterScreen, ScreenResult, View,
};
use app_state::{AppServices, Notification};
use clap::{Parser, Subcommand};
use lostfound_client::http::DEFAULT_BASE_URL;
use lostfound_client::{ClientConfig, FileSessionStore, ObjectFilter, ObjectStatus};
use tracing_subscriber::EnvFilter;

use terminal::TerminalView;

#[derive(Parser)]
#[command(name = "lost-found")]
#[command(about = "Report and track lost & found items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL
    #[arg(long, global = true, env = "LOSTFOUND_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the login session is kept
    #[arg(long, global = true, env = "LOSTFOUND_SESSION_PATH")]
    session_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "LOSTFOUND_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "LOSTFOUND_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// List objects
    List {
        /// Only completed (true) or open (false) objects
        #[arg(long)]
        completed: Option<bool>,

        /// Only objects I reported
        #[arg(long)]
        mine: bool,

        /// Only lost or found objects
        #[arg(long)]
        status: Option<ObjectStatus>,
    },

    /// Show one object
    Show {
        /// Object id
        id: i64,
    },

    /// Report an object
    Add {
        /// Short title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// lost or found
        #[arg(short, long, default_value = "lost")]
        status: ObjectStatus,
    },

    /// Change an object's title or description
    Edit {
        /// Object id
        id: i64,

        /// New title (defaults to the current one)
        #[arg(short, long)]
        title: Option<String>,

        /// New description (defaults to the current one)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark an object as completed
    Complete {
        /// Object id
        id: i64,
    },

    /// Mark an object as not completed
    Reopen {
        /// Object id
        id: i64,
    },

    /// Delete an object
    Delete {
        /// Object id
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn load_env() -> anyhow::Result<()> {
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local").context("Failed to load .env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env").context("Failed to load .env")?;
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let default_filter = format!(
        "{}={level},app_core={level},app_state={level},lostfound_client={level},storage={level},reqwest=warn",
        env!("CARGO_CRATE_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".lost-found")
        .join("session.json")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session_path = cli.session_path.clone().unwrap_or_else(default_session_path);
    tracing::debug!(base_url = %cli.base_url, session = %session_path.display(), "starting");

    let store = FileSessionStore::open(&session_path)
        .await
        .with_context(|| format!("Failed to open session file {}", session_path.display()))?;
    let config = ClientConfig::new(&cli.base_url).with_timeout(Duration::from_secs(cli.timeout));
    let services = AppServices::connect(config, Arc::new(store))
        .await
        .context("Failed to set up the API client")?;

    run(cli.command, services).await
}

async fn run(command: Commands, services: AppServices) -> anyhow::Result<()> {
    let ok = match command {
        Commands::Login { email, password } => {
            let mut screen = LoginScreen::new(services, TerminalView::new());
            match screen.submit(&email, &password).await {
                Some(session) => {
                    let name = session.name.as_deref().unwrap_or(&session.email);
                    println!("Logged in as {name}");
                    true
                }
                None => false,
            }
        }
        Commands::Register { name, email, password } => {
            RegisterScreen::new(services, TerminalView::new())
                .submit(&name, &email, &password)
                .await
        }
        Commands::Logout => match services.auth().logout().outcome().await {
            Notification::Success(()) => {
                println!("Logged out");
                true
            }
            Notification::Error(message) => bail!(message),
            Notification::Loading => false,
        },
        Commands::Whoami => ProfileScreen::new(services, TerminalView::new()).open().await,
        Commands::List { completed, mine, status } => {
            let mut filter = ObjectFilter::default();
            if let Some(completed) = completed {
                filter = filter.completed(completed);
            }
            if mine {
                filter = filter.mine();
            }
            if let Some(status) = status {
                filter = filter.status(status);
            }
            MainScreen::new(services, TerminalView::new()).with_filter(filter).open().await
        }
        Commands::Show { id } => {
            ObjectDetailScreen::new(services, TerminalView::new(), id).open().await
        }
        Commands::Add { title, description, status } => {
            ObjectManageScreen::add(services, TerminalView::new())
                .save(&title, &description, status)
                .await
        }
        Commands::Edit { id, title, description } => {
            let object = match services.objects().get(id).outcome().await {
                Notification::Success(object) => object,
                Notification::Error(message) => bail!(message),
                Notification::Loading => bail!("object {id} did not load"),
            };
            let title = title.unwrap_or_else(|| object.title.clone());
            let description = description.unwrap_or_else(|| object.description.clone());
            let status = object.status;
            ObjectManageScreen::edit(services, TerminalView::new(), object)
                .save(&title, &description, status)
                .await
        }
        Commands::Complete { id } => set_completed(services, id, true).await,
        Commands::Reopen { id } => set_completed(services, id, false).await,
        Commands::Delete { id, yes } => {
            let mut screen =
                ObjectDetailScreen::new(services, TerminalView::new().assume_yes(yes), id);
            screen.open().await && screen.delete().await
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

async fn set_completed(services: AppServices, id: i64, completed: bool) -> bool {
    let mut screen = ObjectDetailScreen::new(services, QuietView::default(), id);
    screen.open().await && screen.set_completed(completed).await
}

/// Only reports toasts and alerts; used where the object itself need not be
/// printed
#[derive(Default)]
struct QuietView(TerminalView);

impl View for QuietView {
    fn show_loading(&mut self, visible: bool) {
        self.0.show_loading(visible);
    }

    fn show_content(&mut self, _visible: bool) {}

    fn toast(&mut self, message: &str) {
        self.0.toast(message);
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.0.alert(title, message);
    }

    fn finish(&mut self, result: ScreenResult) {
        self.0.finish(result);
    }
}
