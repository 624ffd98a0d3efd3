use chrono::NaiveDate;
use serde::Serialize;

use super::status::Status;

/// Canonical action item ("apontamento").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub id: String,
    pub meeting_date: NaiveDate,
    pub agenda_item_description: String,
    pub problem: String,
    pub description: String,
    pub solution: String,
    /// Names joined with ", ".
    pub responsible_parties: String,
    pub territory: String,
    pub deadline: Option<NaiveDate>,
    pub status: Status,
}

impl ActionItem {
    /// Open (not done) with a deadline strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != Status::Done && self.deadline.is_some_and(|d| d < today)
    }

    /// Individual responsible-party names, trimmed.
    pub fn responsible_names(&self) -> impl Iterator<Item = &str> {
        self.responsible_parties.split(',').map(str::trim)
    }
}
