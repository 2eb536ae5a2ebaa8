use anyhow::{anyhow, Context, Result};
use reqwest::header;
use taskdesk_domain::checklist::TaskRecord;
use taskdesk_domain::TaskId;

impl super::HttpClient {
    /// `GET /checklist/` with retry.
    ///
    /// Entries that do not deserialize as a [`TaskRecord`] are dropped with
    /// a warning instead of failing the whole snapshot.
    pub async fn fetch_checklists(&self, token: &str) -> Result<Vec<TaskRecord>> {
        let url = self.config.endpoint("checklist/")?;
        let client = self.client.clone();
        let token = token.to_string();

        let body = self
            .execute_with_retry("Fetch checklists", move || {
                let request = client
                    .get(url.clone())
                    .bearer_auth(&token)
                    .header(header::ACCEPT, "application/json");

                async move {
                    let response = request
                        .send()
                        .await
                        .context("Failed to send checklist request")?;
                    let response = Self::ensure_success(response, "Fetch checklists").await?;
                    response
                        .text()
                        .await
                        .context("Failed to read checklist response")
                }
            })
            .await?;

        let records = decode_checklists(&body)?;
        log::info!("[checklist] fetched records={}", records.len());
        Ok(records)
    }

    /// `PATCH /checklist/done/{id}` with retry.
    ///
    /// Marking done is idempotent on the backend, so retrying after an
    /// ambiguous 5xx is safe.
    pub async fn mark_checklist_done(&self, token: &str, id: &TaskId) -> Result<()> {
        let mut url = self.config.endpoint("checklist/done/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry path segments"))?
            .pop_if_empty()
            .push(id.as_str());

        let client = self.client.clone();
        let token = token.to_string();

        self.execute_with_retry("Mark checklist done", move || {
            let request = client
                .patch(url.clone())
                .bearer_auth(&token)
                .json(&serde_json::json!({}));

            async move {
                let response = request
                    .send()
                    .await
                    .context("Failed to send mark-done request")?;
                Self::ensure_success(response, "Mark checklist done").await?;
                Ok(())
            }
        })
        .await?;

        log::info!("[checklist] marked done task_id={}", id);
        Ok(())
    }
}

fn decode_checklists(body: &str) -> Result<Vec<TaskRecord>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let raw: Option<Vec<serde_json::Value>> =
        serde_json::from_str(body).context("Checklist response is not a JSON array")?;

    let records = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<TaskRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("[checklist] dropping malformed record index={}: {}", index, e);
                None
            }
        })
        .collect();

    Ok(records)
}
