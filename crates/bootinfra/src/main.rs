//! `bootinfra` binary

use std::io::Write;

fn main() -> miette::Result<()> {
    let output = bootinfra::run()?;

    let mut stdout = std::io::stdout().lock();
    if !output.is_empty() {
        writeln!(stdout, "{}", output.trim_end())
            .map_err(|e| miette::miette!("Failed to write output: {e}"))?;
    }
    Ok(())
}
