// SPDX-License-Identifier: MIT OR Apache-2.0

//! Corpus acquisition: cross-reference archive download and invocation of the
//! external scraper tools that produce the per-translation verse JSON.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::process::Command;
use tracing::info;

const CROSS_REFERENCES_URL: &str = "https://a.openbible.info/data/cross-references.zip";
const CROSS_REFERENCES_FILE: &str = "cross_references.txt";
const USER_AGENT: &str = concat!("versegrep/", env!("CARGO_PKG_VERSION"));

/// Downloads the cross-reference archive and extracts `cross_references.txt`
/// into the resources directory. A non-200 response is fatal.
pub fn download_cross_references(resources_dir: &Path) -> Result<()> {
    info!("downloading scripture cross references");
    let response = match ureq::get(CROSS_REFERENCES_URL)
        .set("User-Agent", USER_AGENT)
        .call()
    {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            bail!("There was an error when downloading, please try again later. Status Code: {code}")
        }
        Err(err) => return Err(err).context("cross-reference download failed"),
    };

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .context("failed to read cross-reference archive body")?;

    let mut archive = zip::ZipArchive::new(Cursor::new(body))
        .context("cross-reference archive is not a valid zip")?;
    let mut entry = archive
        .by_name(CROSS_REFERENCES_FILE)
        .context("cross_references.txt missing from archive")?;

    let target = resources_dir.join(CROSS_REFERENCES_FILE);
    let mut out = fs::File::create(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;
    std::io::copy(&mut entry, &mut out)
        .with_context(|| format!("failed to extract {}", target.display()))?;

    info!("extracted cross references to {}", target.display());
    Ok(())
}

/// Runs the external scraper and version splitter, producing one JSON file per
/// translation under `<data>/versions/`.
pub fn scrape_translations(data_path: &Path, resume: bool) -> Result<()> {
    let bible_data = data_path.join("bible_data.json");

    let scraper = which::which("bible-scraper")
        .context("bible-scraper not found on PATH; install the scraper tools first")?;
    let mut cmd = Command::new(scraper);
    cmd.arg("--output").arg(&bible_data);
    if resume {
        cmd.arg("--resume");
    }
    run_tool(cmd, "bible-scraper")?;

    let splitter = which::which("separate-versions")
        .context("separate-versions not found on PATH; install the scraper tools first")?;
    let mut cmd = Command::new(splitter);
    cmd.arg("--input")
        .arg(&bible_data)
        .arg("--output")
        .arg(data_path.join("versions"));
    run_tool(cmd, "separate-versions")
}

fn run_tool(mut cmd: Command, name: &str) -> Result<()> {
    info!("running {name}");
    let status = cmd
        .status()
        .with_context(|| format!("failed to run {name}"))?;
    if !status.success() {
        bail!("{name} exited with status {status}");
    }
    Ok(())
}
