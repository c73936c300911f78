use lambda_http::{run, Error};
use library_catalog::catalog::controller::routes;
use library_catalog::core::controller::AppState;
use library_catalog::utils::logging::{setup_lambda_env, setup_tracing};

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/images-test.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let state = AppState::from_env()?;
    setup_tracing(state.config().log_level.as_str());
    if state.config().dev_mode {
        setup_lambda_env();
    }
    tracing::info!(branch = state.config().branch_id.as_str(), store = ?state.store(), "starting catalog");

    run(routes(state)).await
}
