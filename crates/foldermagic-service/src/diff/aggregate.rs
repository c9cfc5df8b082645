//! Folding per-action outcomes into an [`ApplicationResult`].

use foldermagic_entity::action::{ActionOutcome, ApplicationResult};

/// Summarize outcomes that are already in list order.
pub fn build_result(outcomes: Vec<ActionOutcome>) -> ApplicationResult {
    let total = outcomes.len();
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    ApplicationResult {
        total,
        succeeded,
        failed: total - succeeded,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use foldermagic_entity::action::Action;

    use super::*;

    #[test]
    fn test_counts() {
        let action = Action::rename("f", "n.txt").unwrap();
        let result = build_result(vec![
            ActionOutcome::succeeded(0, &action),
            ActionOutcome::failed(1, &action, "boom", Some("500".into())),
            ActionOutcome::succeeded(2, &action),
        ]);
        assert_eq!(result.total, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert!(!result.is_complete_success());
    }

    #[test]
    fn test_empty() {
        assert_eq!(build_result(Vec::new()), ApplicationResult::empty());
    }
}
