use webster::{config::Config, router, Global};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::load_or_default("./data/config.toml")?;
    let addr = config.listen;
    let app = router(Global::new(config));

    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
