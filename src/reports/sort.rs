use serde::{Deserialize, Serialize};

use super::columns::Column;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub dir: SortDir,
}

impl SortSpec {
    pub fn new(field: &str, dir: SortDir) -> Self {
        SortSpec { field: field.to_string(), dir }
    }
}

/// Sort options offered for a record type: `(key, label)` of sortable columns.
pub fn options<T>(columns: &[Column<T>]) -> Vec<(&'static str, &'static str)> {
    columns.iter().filter(|c| c.sortable).map(|c| (c.key, c.label)).collect()
}

/// Stable sort of `records` by the column named in `spec`.
///
/// An unknown field leaves the order untouched and returns false.
pub fn sort_records<T>(records: &mut [T], columns: &[Column<T>], spec: &SortSpec) -> bool {
    let Some(column) = columns.iter().find(|c| c.key == spec.field) else {
        if !spec.field.is_empty() {
            log::warn!("Unknown report sort field '{}', keeping input order", spec.field);
        }
        return false;
    };
    records.sort_by(|a, b| {
        let ord = (column.value)(a).compare(&(column.value)(b));
        match spec.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    true
}
