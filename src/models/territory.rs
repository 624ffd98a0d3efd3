use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Reference territory, independent of meeting activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Territory {
    pub id: String,
    pub name: String,
}

/// All territories ordered by name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Territory>, sqlx::Error> {
    sqlx::query_as::<_, Territory>(
        "SELECT id_territorio::TEXT AS id, nome AS name FROM territorios ORDER BY nome",
    )
    .fetch_all(pool)
    .await
}

/// Territory names in reference order, for filter option sets.
pub fn names(territories: &[Territory]) -> Vec<String> {
    territories.iter().map(|t| t.name.clone()).collect()
}
