use lambda_http::{run, Error};
use library_catalog::circulation::controller::routes;
use library_catalog::core::controller::AppState;
use library_catalog::utils::logging::{setup_lambda_env, setup_tracing};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let state = AppState::from_env()?;
    setup_tracing(state.config().log_level.as_str());
    if state.config().dev_mode {
        setup_lambda_env();
    }
    tracing::info!(branch = state.config().branch_id.as_str(), store = ?state.store(), "starting circulation");

    run(routes(state)).await
}
