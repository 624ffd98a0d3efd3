use chrono::NaiveDate;
use serde::Serialize;

use super::status::Status;

/// Canonical agenda item with its action counts.
///
/// `total_actions == pending_count + in_progress_count + done_count` always holds.
/// In the cross-meeting rollup `territory` is a display label (one name or
/// `"<N> territórios"`) while `territories` keeps the real contributing names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaItem {
    pub id: String,
    pub description: String,
    pub territory: String,
    pub territories: Vec<String>,
    pub meeting_date: NaiveDate,
    pub total_actions: usize,
    pub pending_count: usize,
    pub in_progress_count: usize,
    pub done_count: usize,
}

impl AgendaItem {
    pub fn count_for(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending_count,
            Status::InProgress => self.in_progress_count,
            Status::Done => self.done_count,
        }
    }

    pub(crate) fn add_action(&mut self, status: Status) {
        self.total_actions += 1;
        match status {
            Status::Pending => self.pending_count += 1,
            Status::InProgress => self.in_progress_count += 1,
            Status::Done => self.done_count += 1,
        }
    }
}

/// Display label for a set of contributing territories.
pub fn territory_label(territories: &[String]) -> String {
    match territories {
        [single] => single.clone(),
        many => format!("{} territórios", many.len()),
    }
}
