//! Boot steps run against the dry-run platform

use bootinfra_infrastructure::Provider;

pub fn setup_ssh(provider: &Provider, platform: &str, user: &str) -> miette::Result<String> {
    provider.get(platform)?.setup_ssh(user)?;
    Ok(format!("ssh configured for {user} on {platform}"))
}

/// Applies the networks from the registry settings, as the agent does.
pub fn setup_networking(provider: &Provider, platform: &str) -> miette::Result<String> {
    let infrastructure = provider.get(platform)?;
    let settings = infrastructure.get_settings()?;
    infrastructure.setup_networking(&settings.networks)?;

    let names: Vec<&str> = settings.networks.keys().map(String::as_str).collect();
    Ok(format!(
        "networking configured on {platform}: [{}]",
        names.join(", ")
    ))
}
