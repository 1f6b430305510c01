use bootinfra_infrastructure::{Networks, Provider};
use miette::IntoDiagnostic;
use serde::Serialize;

/// Everything a metadata service reports, at one point in time.
#[derive(Debug, Serialize)]
struct MetadataSnapshot {
    platform: String,
    available: bool,
    instance_id: String,
    server_name: String,
    registry_endpoint: String,
    networks: Option<Networks>,
}

pub fn execute(provider: &Provider, platform: &str) -> miette::Result<String> {
    let service = provider.metadata_service(platform)?;
    service.load()?;

    let snapshot = MetadataSnapshot {
        platform: platform.to_string(),
        available: service.is_available(),
        instance_id: service.instance_id()?,
        server_name: service.server_name()?,
        registry_endpoint: service.registry_endpoint()?,
        networks: service.networks()?,
    };
    tracing::debug!(?snapshot, "Collected metadata");

    serde_json::to_string_pretty(&snapshot).into_diagnostic()
}
