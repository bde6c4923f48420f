//! The status model: the rules linking boards, columns, and tasks through
//! the free-form status string.
//!
//! A column's status doubles as the join key tasks are grouped by, without
//! any foreign-key constraint backing it. Three static statuses are always
//! presented as columns even though no row exists for them. All key
//! derivation and comparison lives here so the server and the embedded
//! client (which mirrors these functions in `ui/dist/app.js`) cannot drift.

use super::models::{Column, ColumnGroup, Task};

/// A status that is always presented as a column and can never be deleted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticStatus {
    pub key: &'static str,
    pub label: &'static str,
}

/// The three baseline workflow stages, in display order.
pub const STATIC_STATUSES: [StaticStatus; 3] = [
    StaticStatus {
        key: "TODO",
        label: "TODO",
    },
    StaticStatus {
        key: "IN_PROGRESS",
        label: "DOING",
    },
    StaticStatus {
        key: "DONE",
        label: "DONE",
    },
];

/// Default status assigned to tasks created without one.
pub const DEFAULT_TASK_STATUS: &str = "TODO";

/// Normalizes a human-entered column title into a status key: uppercased,
/// with each run of whitespace collapsed to a single underscore and
/// leading/trailing whitespace dropped.
///
/// Idempotent: applying it twice yields the same result as once. Two
/// differently-worded titles may normalize to the same key; no collision
/// detection happens here (see DESIGN.md).
pub fn derive_status_key(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// True when the status is one of the three static keys.
pub fn is_static(status: &str) -> bool {
    STATIC_STATUSES.iter().any(|s| s.key == status)
}

/// Static columns are protected from deletion; everything else may go.
pub fn is_deletable(status: &str) -> bool {
    !is_static(status)
}

/// Returns the `order` value for the next column on a board: one more than
/// the current maximum, or 0 for a board with no columns yet.
pub fn next_column_order(columns: &[Column]) -> i64 {
    columns.iter().map(|c| c.order).max().map_or(0, |max| max + 1)
}

/// One entry of the displayed column set.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveColumn {
    pub status: String,
    pub title: String,
    pub is_static: bool,
}

/// Computes the displayed column set for a board: the three static statuses
/// first, in fixed order regardless of stored column order, then the stored
/// columns ordered by (`order`, id) so order ties break by insertion.
///
/// A stored column whose status matches a static key is not emitted twice:
/// its title replaces the static label, but the entry keeps the static
/// position and stays protected.
pub fn effective_columns(columns: &[Column]) -> Vec<EffectiveColumn> {
    let mut sorted: Vec<&Column> = columns.iter().collect();
    sorted.sort_by_key(|c| (c.order, c.id));

    let mut result = Vec::with_capacity(STATIC_STATUSES.len() + sorted.len());
    for st in &STATIC_STATUSES {
        let title = sorted
            .iter()
            .find(|c| c.status == st.key)
            .map_or(st.label, |c| c.title.as_str());
        result.push(EffectiveColumn {
            status: st.key.to_string(),
            title: title.to_string(),
            is_static: true,
        });
    }
    for col in sorted {
        if is_static(&col.status) {
            continue;
        }
        result.push(EffectiveColumn {
            status: col.status.clone(),
            title: col.title.clone(),
            is_static: false,
        });
    }
    result
}

/// Groups tasks under the effective column set. Tasks whose status matches
/// no effective column are appended as trailing groups labelled with the
/// raw status string, so an orphaned status stays visible after its column
/// is deleted.
pub fn group_tasks(columns: &[Column], tasks: &[Task]) -> Vec<ColumnGroup> {
    let mut groups: Vec<ColumnGroup> = effective_columns(columns)
        .into_iter()
        .map(|col| ColumnGroup {
            tasks: tasks
                .iter()
                .filter(|t| t.status == col.status)
                .cloned()
                .collect(),
            status: col.status,
            title: col.title,
            is_static: col.is_static,
        })
        .collect();

    for task in tasks {
        if groups.iter().any(|g| g.status == task.status) {
            continue;
        }
        groups.push(ColumnGroup {
            status: task.status.clone(),
            title: task.status.clone(),
            is_static: false,
            tasks: tasks
                .iter()
                .filter(|t| t.status == task.status)
                .cloned()
                .collect(),
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::models::Priority;

    fn column(id: i64, title: &str, status: &str, order: i64) -> Column {
        Column {
            id,
            board_id: 1,
            title: title.to_string(),
            status: status.to_string(),
            order,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn task(id: i64, status: &str) -> Task {
        Task {
            id,
            board_id: 1,
            title: format!("task-{}", id),
            description: None,
            status: status.to_string(),
            priority: Priority::Medium,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_derive_status_key_examples() {
        assert_eq!(derive_status_key("In Review"), "IN_REVIEW");
        assert_eq!(derive_status_key("code   review"), "CODE_REVIEW");
        assert_eq!(derive_status_key("  QA  "), "QA");
    }

    #[test]
    fn test_derive_status_key_idempotent() {
        for s in &["In Review", "code   review", "TODO", "a\tb\nc", "", "  "] {
            let once = derive_status_key(s);
            assert_eq!(derive_status_key(&once), once);
        }
    }

    #[test]
    fn test_is_deletable() {
        assert!(!is_deletable("TODO"));
        assert!(!is_deletable("IN_PROGRESS"));
        assert!(!is_deletable("DONE"));
        assert!(is_deletable("CODE_REVIEW"));
        // Near-misses of static keys are ordinary statuses.
        assert!(is_deletable("TO_DO"));
        assert!(is_deletable("todo"));
    }

    #[test]
    fn test_next_column_order_empty_is_zero() {
        assert_eq!(next_column_order(&[]), 0);
    }

    #[test]
    fn test_next_column_order_is_max_plus_one() {
        let cols = vec![column(1, "A", "A", 0), column(2, "B", "B", 3)];
        assert_eq!(next_column_order(&cols), 4);
    }

    #[test]
    fn test_effective_columns_statics_always_first() {
        // Stored columns deliberately ordered ahead of the statics.
        let cols = vec![
            column(1, "In Review", "IN_REVIEW", 0),
            column(2, "QA", "QA", 1),
        ];
        let effective = effective_columns(&cols);
        let statuses: Vec<&str> = effective.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(
            statuses,
            vec!["TODO", "IN_PROGRESS", "DONE", "IN_REVIEW", "QA"]
        );
        assert!(effective[0].is_static && effective[1].is_static && effective[2].is_static);
        assert_eq!(effective[1].title, "DOING");
        assert!(!effective[3].is_static);
    }

    #[test]
    fn test_effective_columns_empty_board_yields_statics() {
        let effective = effective_columns(&[]);
        assert_eq!(effective.len(), 3);
        let statuses: Vec<&str> = effective.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(statuses, vec!["TODO", "IN_PROGRESS", "DONE"]);
    }

    #[test]
    fn test_effective_columns_stored_static_not_duplicated() {
        // A stored row re-labelling DONE keeps the static slot, with the
        // stored title winning for display.
        let cols = vec![
            column(1, "Shipped", "DONE", 0),
            column(2, "QA", "QA", 1),
        ];
        let effective = effective_columns(&cols);
        assert_eq!(effective.len(), 4);
        assert_eq!(effective[2].status, "DONE");
        assert_eq!(effective[2].title, "Shipped");
        assert!(effective[2].is_static);
        assert_eq!(
            effective.iter().filter(|c| c.status == "DONE").count(),
            1
        );
    }

    #[test]
    fn test_effective_columns_order_ties_break_by_id() {
        let cols = vec![
            column(5, "Later", "LATER", 2),
            column(3, "First", "FIRST", 2),
            column(4, "Mid", "MID", 1),
        ];
        let effective = effective_columns(&cols);
        let stored: Vec<&str> = effective
            .iter()
            .filter(|c| !c.is_static)
            .map(|c| c.status.as_str())
            .collect();
        assert_eq!(stored, vec!["MID", "FIRST", "LATER"]);
    }

    #[test]
    fn test_group_tasks_places_tasks_under_matching_column() {
        let cols = vec![column(1, "In Review", "IN_REVIEW", 0)];
        let tasks = vec![task(1, "TODO"), task(2, "IN_REVIEW"), task(3, "IN_REVIEW")];
        let groups = group_tasks(&cols, &tasks);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].tasks.len(), 1);
        let review = groups.iter().find(|g| g.status == "IN_REVIEW").unwrap();
        assert_eq!(review.tasks.len(), 2);
        assert_eq!(review.title, "In Review");
    }

    #[test]
    fn test_group_tasks_orphaned_status_gets_trailing_group() {
        let tasks = vec![task(1, "ARCHIVED"), task(2, "ARCHIVED")];
        let groups = group_tasks(&[], &tasks);
        assert_eq!(groups.len(), 4);
        let last = groups.last().unwrap();
        assert_eq!(last.status, "ARCHIVED");
        assert_eq!(last.title, "ARCHIVED");
        assert!(!last.is_static);
        assert_eq!(last.tasks.len(), 2);
    }
}
