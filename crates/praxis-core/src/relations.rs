//! Relation names and select expressions.
//!
//! Pure string functions. These define the canonical names the stores use
//! for tables, views and embedded selects.

use uuid::Uuid;

pub const TEMPLATES: &str = "assessment_templates";

pub const INSTANCES: &str = "assessment_instances";

pub const CLIENTS: &str = "clients";

/// Read-only view with one row per instance: its most recent score.
pub const LATEST_SCORES: &str = "assessment_latest_scores";

pub const TEMPLATE_SUMMARY_COLUMNS: &str = "id,name,abbreviation,category";

pub const CLIENT_SUMMARY_COLUMNS: &str = "id,first_name,last_name";

/// Select expression for instances with their template and client embedded.
pub fn joined_instance_select() -> String {
    format!(
        "*,template:{TEMPLATES}({TEMPLATE_SUMMARY_COLUMNS}),client:{CLIENTS}({CLIENT_SUMMARY_COLUMNS})"
    )
}

/// Select expression for latest scores with the owning instance embedded.
pub fn scored_instance_select() -> String {
    format!("*,instance:{INSTANCES}!inner(*)")
}

pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

pub fn in_list(ids: &[Uuid]) -> String {
    let joined = ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({joined})")
}
