//! CLI module for classbook.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Wiring of config, storage, transport, and repositories
//! - Running a command through the view state holders and printing the result
//!
//! # Usage
//!
//! ```ignore
//! use classbook::cli::{parse_args, run_cli_command, Context};
//! use classbook::config::ClientConfig;
//!
//! let command = parse_args(std::env::args());
//! let ctx = Context::from_config(&ClientConfig::from_env())?;
//! run_cli_command(command, &ctx).await?;
//! ```

pub mod args;
pub mod output;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::VERSION;

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use std::sync::Arc;

use crate::adapters::{FileStore, ReqwestHttpClient};
use crate::api::MyGradesFilter;
use crate::config::ClientConfig;
use crate::repository::Repositories;
use crate::session::SessionStore;
use crate::traits::{Clock, HttpClient, KeyValueStore, SystemClock};
use crate::view_state::{
    AuthHolder, GradeHolder, NewsHolder, ScheduleHolder, StateHolder, UserHolder, ViewState,
};

/// Shared handles for one CLI invocation.
#[derive(Debug)]
pub struct Context {
    pub session: Arc<SessionStore>,
    pub repos: Repositories,
}

impl Context {
    /// Open the store in the configured data directory and build the
    /// repositories on top of it.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).wrap_err_with(|| {
            format!("Failed to create data directory {}", config.data_dir.display())
        })?;
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(&config.data_dir).wrap_err("Failed to open local store")?);
        let http: Arc<dyn HttpClient> = Arc::new(
            ReqwestHttpClient::with_timeout(config.request_timeout)
                .wrap_err("Failed to build HTTP client")?,
        );
        Ok(Self::new(config, http, store, Arc::new(SystemClock)))
    }

    pub fn new(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = Arc::new(SessionStore::new());
        let repos = Repositories::new(config, http, store, clock, Arc::clone(&session));
        Self { session, repos }
    }
}

/// Run one command, printing its result to stdout.
pub async fn run_cli_command(command: CliCommand, ctx: &Context) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version::version_line()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Invalid(message) => {
            eprintln!("{}", USAGE);
            bail!(message);
        }
        CliCommand::Login { email, password } => {
            let auth = AuthHolder::new(Arc::clone(&ctx.repos.auth), &ctx.session);
            auth.login(&email, &password);
            settled(&*auth).await?;
            if let Some(result) = auth.take_operation_result() {
                println!("{}", result.message());
            }
        }
        CliCommand::Logout => {
            let auth = AuthHolder::new(Arc::clone(&ctx.repos.auth), &ctx.session);
            auth.logout();
            settled(&*auth).await?;
            println!("Signed out");
        }
        CliCommand::WhoAmI => {
            require_session(ctx).await?;
            let user = UserHolder::new(Arc::clone(&ctx.repos.user));
            user.load_user_info();
            let state = settled(&*user).await?;
            let profile = state
                .data
                .ok_or_else(|| eyre!("Server returned no profile"))?;
            print!("{}", output::render_user(&profile));
        }
        CliCommand::Schedule { day, class_name } => {
            let holder = ScheduleHolder::new(Arc::clone(&ctx.repos.schedule));
            let title = match &class_name {
                Some(class_name) => {
                    holder.load_schedule(class_name, day);
                    format!("SCHEDULE {} {}", class_name, day.as_str().to_uppercase())
                }
                None => {
                    holder.load_by_day(day);
                    format!("SCHEDULE {}", day.as_str().to_uppercase())
                }
            };
            let state = settled(&*holder).await?;
            print!("{}", output::render_schedules(&title, &state));
        }
        CliCommand::News { query } => {
            let holder = NewsHolder::new(Arc::clone(&ctx.repos.news));
            match &query {
                Some(query) => holder.search(query),
                None => holder.load_news(),
            }
            let state = settled(&*holder).await?;
            print!("{}", output::render_news(&state));
        }
        CliCommand::Grades { subject } => {
            require_session(ctx).await?;
            let holder = GradeHolder::new(Arc::clone(&ctx.repos.grade));
            holder.load_my_grades(MyGradesFilter {
                subject,
                ..Default::default()
            });
            let state = settled(&*holder).await?;
            print!("{}", output::render_grades(&state.data));
        }
    }
    Ok(())
}

/// Resume the persisted session or fail with a hint.
async fn require_session(ctx: &Context) -> Result<()> {
    let auth = AuthHolder::new(Arc::clone(&ctx.repos.auth), &ctx.session);
    auth.restore_session();
    settled(&*auth).await?;
    if !auth.is_authenticated() {
        bail!("Not signed in. Run `classbook login <email> <password>` first.");
    }
    Ok(())
}

/// Wait for the holder's intents and turn a published error into `Err`.
async fn settled<T>(holder: &StateHolder<T>) -> Result<ViewState<T>>
where
    T: Clone + Send + Sync + 'static,
{
    holder.settle().await;
    let state = holder.state();
    match &state.error {
        Some(message) => Err(eyre!(message.clone())),
        None => Ok(state),
    }
}
