use apiscout::cli::Cli;
use apiscout::config::Config;
use apiscout::core::endpoint::health::{default_client, HealthProbe, ProbeOptions};
use apiscout::core::endpoint::render::{render_candidate, render_resolved, render_round};
use apiscout::core::endpoint::{
    DiagnosticsController, EndpointConfigService, EndpointResolver, EndpointStore,
    FileEndpointStore, PlatformContext,
};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // Handle configuration commands
    if cli.init {
        Config::init()?;
        return Ok(());
    }

    if cli.check {
        let config = Config::load()?;
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|_| Config::default());

    if cli.print {
        config.print()?;
        return Ok(());
    }

    let store: Arc<dyn EndpointStore> = Arc::new(FileEndpointStore::new(config.store_path.clone())?);
    let resolver = EndpointResolver::new(config.resolver_settings(), PlatformContext::from_env());
    let service = EndpointConfigService::new(resolver, Arc::clone(&store))
        .with_placeholder(config.placeholder_image.clone());

    let timeout_ms = match cli.timeout_ms {
        Some(ms) => ProbeOptions::with_timeout_ms(ms).timeout_ms,
        None => config.probe_options().timeout_ms,
    };

    if cli.reset {
        service.reset()?;
        println!("Saved endpoint cleared");
        println!("{}", render_resolved(&service.current()));
        return Ok(());
    }

    if let Some(url) = cli.set.as_deref() {
        let endpoint = service.save(url)?;
        println!("Saved {}", endpoint);
        return Ok(());
    }

    if let Some(path) = cli.rewrite.as_deref() {
        println!("{}", service.rewriter().rewrite(Some(path)));
        return Ok(());
    }

    if cli.wants_resolution() {
        println!("{}", render_resolved(&service.current()));
        return Ok(());
    }

    let controller = DiagnosticsController::new(HealthProbe::new(default_client()?), store, timeout_ms);

    if let Some(url) = cli.probe.as_deref() {
        // Nothing is on the board, so this only reports
        println!("{}", render_candidate(&controller.run_one(url).await));
        return Ok(());
    }

    let urls = match cli.diagnose {
        Some(urls) if !urls.is_empty() => urls,
        _ => config.candidates.clone(),
    };
    let report = controller.run_all(&urls).await;
    println!("{}", render_round(&report));
    println!("{}", render_resolved(&service.current()));
    Ok(())
}
