use tracing_subscriber::EnvFilter;

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")))
        // disable printing the name of the module in every log line.
        .with_target(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .json()
        .init();
}

// lets the lambda runtime start outside of AWS, e.g. under cargo lambda watch
pub fn setup_lambda_env() {
    std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
    std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
    std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
    std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
}
