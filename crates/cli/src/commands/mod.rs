pub mod add;
pub mod config;
pub mod migrate;
pub mod purchase;
pub mod remove;
pub mod session;
pub mod show;

use serde::Serialize;

use cartview_core::config::{AppConfig, LoadOptions};
use cartview_core::{
    ApplicationError, Catalog, CartView, CatalogLoader, InMemoryNotifier, JsonCatalogLoader,
};
use cartview_db::{connect, migrations, DbPool, SqlCartStore};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn from_outcome(command: &str, outcome: Result<String, Failure>) -> Self {
        match outcome {
            Ok(message) => Self::success(command, message),
            Err((error_class, message, exit_code)) => {
                Self::failure(command, error_class, message, exit_code)
            }
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Error class, operator-facing message, exit code.
pub(crate) type Failure = (&'static str, String, u8);

pub(crate) const EXIT_REFUSED: u8 = 1;

/// A cart view mounted against the configured catalog and sqlite store.
pub(crate) struct MountedCart {
    pub pool: DbPool,
    pub catalog: Catalog,
    pub notifier: InMemoryNotifier,
    pub view: CartView<SqlCartStore, InMemoryNotifier>,
}

impl MountedCart {
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Loads config and builds a current-thread runtime, then runs `body` on it.
pub(crate) fn run_with_config<F, Fut>(command: &str, body: F) -> CommandResult
where
    F: FnOnce(AppConfig) -> Fut,
    Fut: std::future::Future<Output = Result<String, Failure>>,
{
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let outcome = runtime.block_on(body(config));
    CommandResult::from_outcome(command, outcome)
}

pub(crate) async fn open_pool(config: &AppConfig) -> Result<DbPool, Failure> {
    let pool = connect(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

    migrations::run_pending(&pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;
    Ok(pool)
}

pub(crate) async fn mount(config: &AppConfig) -> Result<MountedCart, Failure> {
    let catalog = JsonCatalogLoader::new(&config.catalog.path)
        .load_catalog()
        .map_err(|error| application_failure(ApplicationError::from(error)))?;

    let pool = open_pool(config).await?;
    let store = SqlCartStore::new(pool.clone(), config.cart.storage_key.clone());
    let notifier = InMemoryNotifier::default();

    let view = CartView::load(&catalog, store, notifier.clone())
        .await
        .map_err(|error| application_failure(ApplicationError::from(error)))?;

    Ok(MountedCart { pool, catalog, notifier, view })
}

pub(crate) fn application_failure(error: ApplicationError) -> Failure {
    let exit_code = match error {
        ApplicationError::Catalog(_) | ApplicationError::Domain(_) => 6,
        ApplicationError::Persistence(_) => 7,
    };
    (error.error_class(), error.to_string(), exit_code)
}
