//! Field-level validation, applied before any store access.
//!
//! Each validator returns the full list of failures so the client can
//! surface every offending field at once. Character counts use `chars()`
//! so multi-byte input is measured the way a form field measures it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::Priority;

pub const BOARD_TITLE_MAX: usize = 100;
pub const BOARD_DESCRIPTION_MAX: usize = 500;
pub const TASK_TITLE_MAX: usize = 200;
pub const TASK_DESCRIPTION_MAX: usize = 1000;
pub const COLUMN_TITLE_MAX: usize = 100;
pub const COLUMN_STATUS_MAX: usize = 50;

/// One field/message pair in a Validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn check_required_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    match value {
        None => errors.push(FieldError::new(field, format!("{} is required", field))),
        Some(v) => check_text(errors, field, v, max),
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(FieldError::new(field, format!("{} must not be empty", field)));
    } else if len > max {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", field, max),
        ));
    }
}

fn check_optional_text(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.push(FieldError::new(
                field,
                format!("{} must be at most {} characters", field, max),
            ));
        }
    }
}

fn check_priority(errors: &mut Vec<FieldError>, value: Option<&str>) {
    if let Some(p) = value {
        if Priority::from_str(p).is_err() {
            errors.push(FieldError::new(
                "priority",
                "priority must be one of LOW, MEDIUM, HIGH",
            ));
        }
    }
}

pub fn board_create(title: Option<&str>, description: Option<&str>) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_required_text(&mut errors, "title", title, BOARD_TITLE_MAX);
    check_optional_text(&mut errors, "description", description, BOARD_DESCRIPTION_MAX);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn board_update(title: Option<&str>, description: Option<&str>) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Some(t) = title {
        check_text(&mut errors, "title", t, BOARD_TITLE_MAX);
    }
    check_optional_text(&mut errors, "description", description, BOARD_DESCRIPTION_MAX);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Task status is deliberately NOT validated beyond being present when
/// given: status assignment is a pure field mutation and any string is
/// accepted, matching statuses no column defines.
pub fn task_create(
    title: Option<&str>,
    description: Option<&str>,
    priority: Option<&str>,
    board_id: Option<i64>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_required_text(&mut errors, "title", title, TASK_TITLE_MAX);
    check_optional_text(&mut errors, "description", description, TASK_DESCRIPTION_MAX);
    check_priority(&mut errors, priority);
    if board_id.is_none() {
        errors.push(FieldError::new("boardId", "boardId is required"));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn task_update(
    title: Option<&str>,
    description: Option<&str>,
    priority: Option<&str>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Some(t) = title {
        check_text(&mut errors, "title", t, TASK_TITLE_MAX);
    }
    check_optional_text(&mut errors, "description", description, TASK_DESCRIPTION_MAX);
    check_priority(&mut errors, priority);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn column_create(
    title: Option<&str>,
    status: Option<&str>,
    board_id: Option<i64>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_required_text(&mut errors, "title", title, COLUMN_TITLE_MAX);
    check_required_text(&mut errors, "status", status, COLUMN_STATUS_MAX);
    if board_id.is_none() {
        errors.push(FieldError::new("boardId", "boardId is required"));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn column_update(
    title: Option<&str>,
    status: Option<&str>,
    order: Option<i64>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if let Some(t) = title {
        check_text(&mut errors, "title", t, COLUMN_TITLE_MAX);
    }
    if let Some(s) = status {
        check_text(&mut errors, "status", s, COLUMN_STATUS_MAX);
    }
    if let Some(o) = order {
        if o < 0 {
            errors.push(FieldError::new("order", "order must be non-negative"));
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
