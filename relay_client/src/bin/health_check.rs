use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn setup() {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Single GET against `WEBSITE_URL`; exit status reports reachability.
#[actix_rt::main]
async fn main() -> ExitCode {
    setup();

    let Ok(url) = std::env::var("WEBSITE_URL") else {
        error!("WEBSITE_URL environment variable is not set");
        return ExitCode::FAILURE;
    };

    match awc::Client::new().get(url.as_str()).send().await {
        Ok(res) if res.status().as_u16() == 200 => {
            info!(%url, "Website is reachable");
            ExitCode::SUCCESS
        }
        Ok(res) => {
            error!(%url, status = %res.status(), "Website is not reachable");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(%url, "Error connecting to website: {e}");
            ExitCode::FAILURE
        }
    }
}
