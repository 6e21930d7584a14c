use anyhow::Context;
use common::telemetry::{get_tracing_subscriber, init_tracing_subscriber};
use slide_service::{configuration::get_configuration, startup::Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let tracing_subscriber =
        get_tracing_subscriber("slide_service".into(), "info".into(), std::io::stdout);
    init_tracing_subscriber(tracing_subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration")?;

    let application = Application::build(configuration, None)
        .await
        .context("Failed to build application")?;

    application.run_until_stopped().await?;
    Ok(())
}
