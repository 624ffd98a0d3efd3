use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an action item.
///
/// Variant order is the fixed display order used by every status breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Done,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Done];

    /// Map a raw backing-store status string onto a `Status`.
    ///
    /// Case-insensitive substring match: "conclu" wins over "andamento",
    /// anything else (including an empty or missing value) is `Pending`.
    pub fn normalize(raw: &str) -> Status {
        let lower = raw.to_lowercase();
        if lower.contains("conclu") {
            Status::Done
        } else if lower.contains("andamento") {
            Status::InProgress
        } else {
            Status::Pending
        }
    }

    /// Portuguese label shown in tables and reports.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pendente",
            Status::InProgress => "Em andamento",
            Status::Done => "Concluído",
        }
    }

    /// Stable machine key (matches the serde representation).
    pub fn key(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    /// CSS class suffix for report badges.
    pub fn css_class(self) -> &'static str {
        match self {
            Status::Pending => "status-pendente",
            Status::InProgress => "status-em-andamento",
            Status::Done => "status-concluido",
        }
    }

    pub fn from_key(key: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
