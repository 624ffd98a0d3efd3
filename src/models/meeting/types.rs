use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Meeting as returned by the backing store, with its nested children.
///
/// Every text field is optional: the normalizer resolves gaps to placeholders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMeeting {
    pub id: i64,
    #[serde(default)]
    pub territory: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub facilitator: Option<String>,
    #[serde(default)]
    pub agenda_items: Vec<RawAgendaItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAgendaItem {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<RawAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAction {
    pub id: i64,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    /// One entry per responsible-party join row; the name may be missing.
    #[serde(default)]
    pub responsible: Vec<Option<String>>,
}

/// One row of the meeting → agenda → action → responsible LEFT JOIN.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct FlatRow {
    pub meeting_id: i64,
    pub meeting_date: NaiveDate,
    pub meeting_time: Option<String>,
    pub facilitator: Option<String>,
    pub territory: Option<String>,
    pub agenda_id: Option<i64>,
    pub agenda_description: Option<String>,
    pub action_id: Option<i64>,
    pub problem: Option<String>,
    pub action_description: Option<String>,
    pub solution: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<String>,
    pub responsible_id: Option<i64>,
    pub responsible_name: Option<String>,
}

/// Canonical meeting for the meetings view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meeting {
    pub id: String,
    pub territory: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub facilitator: String,
    pub total_agenda_items: usize,
    pub total_actions: usize,
}
