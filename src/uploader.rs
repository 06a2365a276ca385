use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use reqwest::multipart;
use uuid::Uuid;

/// Filename prefix the collector uses to tell genuine uploads from
/// drive-by POSTs.
const UPLOAD_TAG: &str = "wifilog";

/// Sends the finished log file to the collector as a single multipart
/// POST. The file is read as an opaque byte stream; the pipeline never
/// rewrites it.
pub async fn upload(upload_url: &str, log_path: &Path) -> Result<()> {
    let upload_id = Uuid::new_v4();
    let target_name = format!("{UPLOAD_TAG}.{upload_id}");
    info!("uploading {} as {target_name}", log_path.display());

    let bytes = tokio::fs::read(log_path)
        .await
        .with_context(|| format!("failed to read log file {}", log_path.display()))?;

    let part = multipart::Part::bytes(bytes).file_name(target_name.clone());
    let form = multipart::Form::new().part(target_name, part);

    let response = reqwest::Client::new()
        .post(upload_url)
        .multipart(form)
        .send()
        .await
        .context("upload request failed")?;

    let status = response.status();
    if !status.is_success() {
        bail!("upload rejected with status {status}");
    }

    info!("upload finished, status {status}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = upload("http://localhost:9", &dir.path().join("absent.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read log file"));
    }
}
