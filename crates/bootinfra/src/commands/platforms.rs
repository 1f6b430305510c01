use bootinfra_infrastructure::Provider;

/// One line per platform: name and whether its metadata source is present.
pub fn execute(provider: &Provider) -> String {
    provider
        .names()
        .map(|name| {
            let availability = match provider.metadata_service(name) {
                Ok(service) if service.is_available() => "available",
                Ok(_) => "unavailable",
                Err(_) => "no metadata",
            };
            format!("{name}\t{availability}\n")
        })
        .collect()
}
