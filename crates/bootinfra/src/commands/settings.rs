use bootinfra_infrastructure::Provider;
use miette::IntoDiagnostic;

pub fn execute(provider: &Provider, platform: &str) -> miette::Result<String> {
    let settings = provider.get(platform)?.get_settings()?;
    serde_json::to_string_pretty(&settings).into_diagnostic()
}
