use tracing_subscriber::EnvFilter;

use relay::settings::Settings;

fn setup() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    setup();
    relay::application::Application::build(settings)
        .await?
        .run_until_stopped()
        .await?;
    Ok(())
}
