use bootinfra_crypto::MultipleDigest;
use miette::{Context, IntoDiagnostic};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn execute(digest: &str, file: &Path) -> miette::Result<String> {
    let expected: MultipleDigest = digest.parse()?;

    let reader = File::open(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Opening '{}'", file.display()))?;

    expected.verify(BufReader::new(reader))?;

    tracing::info!(file = %file.display(), digest = %expected, "Digest verified");
    Ok(format!("{}: OK ({expected})", file.display()))
}
