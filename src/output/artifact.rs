//! Per-domain trace artifacts
//!
//! One plain-text file per domain that reached the probing stage:
//!
//! ```text
//! === Traceroute for example.com (93.184.216.34) ===
//! Date: 2024-05-01 12:00:00.123456
//! ===================================
//! <raw probe output>
//! ```

use crate::model::ProbeResult;
use crate::output::{candidate_name, file_stamp, MAX_NAME_ATTEMPTS};
use crate::SurveyError;
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Line separating the artifact header from the probe output
pub const SEPARATOR: &str = "===================================";

/// Builds `traceroute_<domain with '.' as '_'>_<YYYYMMDD_HHMMSS>.txt`
pub fn artifact_file_name(domain: &str, at: &DateTime<Local>) -> String {
    format!("traceroute_{}_{}.txt", domain.replace('.', "_"), file_stamp(at))
}

/// Renders the three header lines followed by the probe text
pub fn render_artifact(
    domain: &str,
    address: IpAddr,
    generated_at: &DateTime<Local>,
    body: &str,
) -> String {
    format!(
        "=== Traceroute for {} ({}) ===\nDate: {}\n{}\n{}",
        domain,
        address,
        generated_at.format("%Y-%m-%d %H:%M:%S%.6f"),
        SEPARATOR,
        body
    )
}

/// Writes the artifact for `domain` into `dir` and returns its path
///
/// The file is created exclusively. If a file with the deterministic name
/// already exists (same domain within the same second), a numeric suffix is
/// added so an existing artifact is never overwritten.
pub async fn write_artifact(
    dir: &Path,
    domain: &str,
    probe: &ProbeResult,
) -> Result<PathBuf, SurveyError> {
    let now = Local::now();
    let content = render_artifact(domain, probe.address, &now, &probe.raw_output);
    let base = artifact_file_name(domain, &now);

    let mut attempt = 0;
    loop {
        let path = dir.join(candidate_name(&base, attempt));
        let opened = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;

        match opened {
            Ok(mut file) => {
                let written = match file.write_all(content.as_bytes()).await {
                    Ok(()) => file.flush().await,
                    Err(e) => Err(e),
                };

                return match written {
                    Ok(()) => {
                        tracing::debug!(domain, path = %path.display(), "Artifact written");
                        Ok(path)
                    }
                    Err(source) => Err(SurveyError::Artifact { path, source }),
                };
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                attempt += 1;
            }
            Err(source) => return Err(SurveyError::Artifact { path, source }),
        }
    }
}
