//! JSON payloads for the assistant-facing tools.
//!
//! The chat layer forwards tool calls here verbatim and returns the JSON
//! values to the model unchanged.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use foldermagic_core::error::AppError;
use foldermagic_core::result::AppResult;
use foldermagic_entity::action::DiffList;

use crate::structure::StructureService;

#[derive(Debug, Deserialize)]
struct ProposalBatch {
    proposals: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Proposal {
    #[serde(alias = "user_email")]
    user_key: String,
    actions: DiffList,
}

/// The `read_structure` and `propose_actions` tools.
#[derive(Debug, Clone)]
pub struct AssistantTools {
    structures: Arc<StructureService>,
}

impl AssistantTools {
    /// Creates the tool set over a structure service.
    pub fn new(structures: Arc<StructureService>) -> Self {
        Self { structures }
    }

    /// `{"current", "proposed", "diff"}` for the user; all `null` if the
    /// user has no record.
    pub async fn read_structure(&self, user_key: &str) -> AppResult<Value> {
        let record = self.structures.read(user_key).await?;
        info!(user_key, found = record.is_some(), "read_structure tool called");

        let payload = match record {
            Some(record) => json!({
                "current": record.current,
                "proposed": record.proposed,
                "diff": record.diff,
            }),
            None => json!({ "current": null, "proposed": null, "diff": null }),
        };
        Ok(payload)
    }

    /// Run `update` for every proposal in order.
    ///
    /// A malformed or failing proposal is reported in its result entry and
    /// does not stop the remaining ones. Only a payload without a
    /// `proposals` list is rejected as a whole.
    pub async fn propose_actions(&self, payload: Value) -> AppResult<Value> {
        let batch: ProposalBatch = serde_json::from_value(payload).map_err(|e| {
            AppError::validation(format!("propose_actions expects {{\"proposals\": [...]}}: {e}"))
        })?;

        let mut results = Vec::with_capacity(batch.proposals.len());
        for raw in batch.proposals {
            let user_key = raw
                .get("user_key")
                .or_else(|| raw.get("user_email"))
                .cloned()
                .unwrap_or(Value::Null);

            let result = match serde_json::from_value::<Proposal>(raw) {
                Ok(proposal) => match self
                    .structures
                    .update(&proposal.user_key, proposal.actions)
                    .await
                {
                    Ok(update) => json!({
                        "user_key": proposal.user_key,
                        "status": "success",
                        "applied": update.report.succeeded,
                        "skipped": update.report.failures().collect::<Vec<_>>(),
                    }),
                    Err(e) => error_entry(user_key, &e.to_string()),
                },
                Err(e) => error_entry(user_key, &format!("Invalid proposal: {e}")),
            };
            results.push(result);
        }

        Ok(json!({ "results": results }))
    }
}

fn error_entry(user_key: Value, message: &str) -> Value {
    warn!(user_key = %user_key, error = message, "Proposal rejected");
    json!({ "user_key": user_key, "status": "error", "error": message })
}
