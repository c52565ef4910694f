use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use super::draft::ProjectDraft;

/// How long the pretend network round trip takes.
const SIMULATED_SUBMIT_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Validate the draft and simulate a submission. There is no backend:
/// the draft is discarded after the delay and only the receipt survives.
#[tauri::command]
pub async fn submit_project(draft: ProjectDraft) -> Result<SubmissionReceipt, String> {
    draft.validate().map_err(|e| e.to_string())?;

    sleep(Duration::from_millis(SIMULATED_SUBMIT_DELAY_MS)).await;

    let receipt = SubmissionReceipt {
        id: Uuid::new_v4().to_string(),
        submitted_at: Utc::now(),
    };
    info!(
        "simulated submission of '{}' accepted as {}",
        draft.title, receipt.id
    );
    Ok(receipt)
}
