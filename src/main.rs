use futures::future::join_all;
use std::process::ExitCode;

use llmgate::llm::{CallContext, ProviderRegistry};
use llmgate::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,llmgate=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(target: "llmgate", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if settings.targets.is_empty() {
        tracing::error!(target: "llmgate", "nothing to probe: set OPENAI_API_KEY or ANTHROPIC_API_KEY");
        return ExitCode::FAILURE;
    }

    let registry = match ProviderRegistry::from_settings(&settings.providers) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(target: "llmgate", error = %e, "failed to build provider registry");
            return ExitCode::FAILURE;
        }
    };

    let probes = settings.targets.iter().map(|target| {
        let ctx = CallContext::new().with_timeout(settings.probe_timeout);
        let registry = &registry;
        let credentials = &settings.credentials;
        async move {
            registry
                .probe(&target.provider, &target.model, credentials, &ctx)
                .await
        }
    });

    let mut all_reachable = true;
    for result in join_all(probes).await {
        match result {
            Ok(probe) => {
                all_reachable &= probe.is_reachable();
                println!(
                    "{:<10} {:<32} {:<22} {:>6}ms {}",
                    probe.provider,
                    probe.model,
                    probe.outcome.to_string(),
                    probe.latency_ms,
                    probe.message.unwrap_or_default()
                );
            }
            Err(e) => {
                all_reachable = false;
                println!("{}", e);
            }
        }
    }

    if all_reachable {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
