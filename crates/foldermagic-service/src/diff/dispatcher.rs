//! Batched, order-preserving application of diff lists to a remote store.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info, warn};

use foldermagic_core::config::engine::EngineConfig;
use foldermagic_core::result::AppResult;
use foldermagic_core::traits::remote::{
    BatchRequest, BatchResponse, MAX_BATCH_SIZE, RemoteError, RemoteRequest, RemoteStore,
};
use foldermagic_entity::action::{Action, ActionOutcome, ApplicationResult, DiffList};

use super::aggregate::build_result;
use super::resolution::ResolutionTable;
use super::translator::translate;

/// Applies diff lists to a remote store in chunks of grouped requests.
///
/// Chunks run strictly one after another. Inside a chunk the store may
/// complete sub-requests in any order; outcomes are put back in list
/// order through the index tag each sub-request carries.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    remote: Arc<dyn RemoteStore>,
    batch_size: usize,
}

impl BatchDispatcher {
    /// Create a dispatcher with the default chunk size.
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        let batch_size = remote.max_batch_size().clamp(1, MAX_BATCH_SIZE);
        Self { remote, batch_size }
    }

    /// Create a dispatcher using the configured chunk size.
    pub fn from_config(remote: Arc<dyn RemoteStore>, config: &EngineConfig) -> Self {
        Self::new(remote).with_batch_size(config.effective_batch_size())
    }

    /// Override the chunk size. Clamped to what the store accepts.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        let limit = self.remote.max_batch_size().clamp(1, MAX_BATCH_SIZE);
        self.batch_size = batch_size.clamp(1, limit);
        self
    }

    /// The chunk size in use.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Apply `diff` to the remote store.
    ///
    /// Per-action failures are reported in the outcomes. The only error is
    /// an unusable remote client, in which case nothing is attempted.
    pub async fn apply(&self, diff: &DiffList) -> AppResult<ApplicationResult> {
        self.remote.ensure_ready().await?;

        let actions = diff.as_slice();
        if actions.is_empty() {
            return Ok(ApplicationResult::empty());
        }

        let chunks = plan_chunks(actions, self.batch_size);
        info!(
            provider = self.remote.provider_type(),
            total = actions.len(),
            chunks = chunks.len(),
            batch_size = self.batch_size,
            "Applying diff list"
        );

        let mut outcomes: Vec<Option<ActionOutcome>> = vec![None; actions.len()];
        let mut table = ResolutionTable::new();

        for (chunk_no, range) in chunks.into_iter().enumerate() {
            debug!(
                chunk = chunk_no,
                start = range.start,
                len = range.len(),
                "Dispatching chunk"
            );
            self.dispatch_chunk(actions, range, &mut table, &mut outcomes)
                .await;
        }

        let outcomes = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|| {
                    ActionOutcome::failed(index, &actions[index], "Action was not dispatched", None)
                })
            })
            .collect();
        let result = build_result(outcomes);

        info!(
            total = result.total,
            succeeded = result.succeeded,
            failed = result.failed,
            "Diff list applied"
        );
        Ok(result)
    }

    async fn dispatch_chunk(
        &self,
        actions: &[Action],
        range: Range<usize>,
        table: &mut ResolutionTable,
        outcomes: &mut [Option<ActionOutcome>],
    ) {
        let mut requests = Vec::with_capacity(range.len());

        for index in range {
            let action = &actions[index];
            table.declare(action);

            if !self.remote.supports(action.action_type()) {
                let message = format!("Unsupported action type: {}", action.action_type());
                let outcome = ActionOutcome::failed(index, action, message, None);
                record_failure(table, outcomes, action, outcome);
                continue;
            }

            let resolved = match table.apply(action) {
                Ok(resolved) => resolved,
                Err(reference) => {
                    let message = format!("Unresolved placeholder reference: {reference}");
                    let outcome = ActionOutcome::failed(index, action, message, None);
                    record_failure(table, outcomes, action, outcome);
                    continue;
                }
            };

            match translate(&resolved, self.remote.as_ref()).await {
                Ok(request) => requests.push(BatchRequest {
                    tag: index,
                    request,
                }),
                Err(err) => {
                    let outcome = ActionOutcome::from_remote_error(index, action, &err);
                    record_failure(table, outcomes, action, outcome);
                }
            }
        }

        if requests.is_empty() {
            return;
        }

        let kinds: HashMap<usize, bool> = requests
            .iter()
            .map(|r| (r.tag, matches!(r.request, RemoteRequest::CreateFolder { .. })))
            .collect();

        match self.remote.execute_batch(requests).await {
            Ok(responses) => self.collect_responses(actions, responses, &kinds, table, outcomes),
            Err(err) => {
                warn!(error = %err, requests = kinds.len(), "Grouped request failed");
                for &index in kinds.keys() {
                    let action = &actions[index];
                    let outcome = ActionOutcome::from_remote_error(index, action, &err);
                    record_failure(table, outcomes, action, outcome);
                }
            }
        }
    }

    fn collect_responses(
        &self,
        actions: &[Action],
        responses: Vec<BatchResponse>,
        kinds: &HashMap<usize, bool>,
        table: &mut ResolutionTable,
        outcomes: &mut [Option<ActionOutcome>],
    ) {
        for BatchResponse { tag, result } in responses {
            let Some(&is_create) = kinds.get(&tag) else {
                warn!(tag, "Ignoring response with an unknown tag");
                continue;
            };
            let action = &actions[tag];
            match result {
                Ok(response) if is_create => {
                    table.resolve(action, response.id.clone());
                    outcomes[tag] = Some(ActionOutcome::created(tag, action, response.id));
                }
                Ok(_) => outcomes[tag] = Some(ActionOutcome::succeeded(tag, action)),
                Err(err) => {
                    let outcome = ActionOutcome::from_remote_error(tag, action, &err);
                    record_failure(table, outcomes, action, outcome);
                }
            }
        }

        for &tag in kinds.keys() {
            if outcomes[tag].is_none() {
                let err = RemoteError::transport("No response received for request");
                let action = &actions[tag];
                let outcome = ActionOutcome::from_remote_error(tag, action, &err);
                record_failure(table, outcomes, action, outcome);
            }
        }
    }
}

fn record_failure(
    table: &mut ResolutionTable,
    outcomes: &mut [Option<ActionOutcome>],
    action: &Action,
    outcome: ActionOutcome,
) {
    warn!(
        index = outcome.index,
        action_type = %outcome.action_type,
        entity_id = outcome.entity_id.as_deref().unwrap_or("-"),
        error = outcome.error_message.as_deref().unwrap_or(""),
        code = outcome.error_code.as_deref().unwrap_or("-"),
        "Action failed"
    );
    table.fail(action);
    let index = outcome.index;
    outcomes[index] = Some(outcome);
}

/// Split `actions` into contiguous chunks of at most `batch_size`.
///
/// A chunk is also closed early when the next action references a
/// placeholder declared inside it, so the create has an id by the time
/// the dependent action is translated, or when it acts on an entity an
/// earlier action of the chunk already acts on. A move is translated
/// from the entity's parents before the chunk runs, so two edits of one
/// entity must see each other's effect.
pub fn plan_chunks(actions: &[Action], batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut open: HashSet<&str> = HashSet::new();
    let mut touched: HashSet<&str> = HashSet::new();

    for (index, action) in actions.iter().enumerate() {
        let full = index - start == batch_size;
        let depends = action.references().any(|r| open.contains(r));
        let repeats = action.entity_id().is_some_and(|id| touched.contains(id));
        if full || depends || repeats {
            chunks.push(start..index);
            start = index;
            open.clear();
            touched.clear();
        }
        if let Some(placeholder) = action.placeholder_id() {
            open.insert(placeholder);
        }
        if let Some(entity_id) = action.entity_id() {
            touched.insert(entity_id);
        }
    }
    if start < actions.len() {
        chunks.push(start..actions.len());
    }
    chunks
}
