use carrel_storage::query_log;
use time::{Duration, OffsetDateTime};

use crate::{CarrelService, Result};

/// Popularity is measured over a trailing month, matching the freshness
/// horizon used in scoring.
const TOP_QUERY_WINDOW_DAYS: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TopQuery {
	pub query: String,
	pub count: i64,
}

impl CarrelService {
	/// Appends one row to the query log.
	pub async fn log_query(&self, query: &str, user_id: Option<&str>) -> Result<()> {
		query_log::append(&self.db.pool, query, user_id).await?;

		Ok(())
	}

	/// Most frequent queries over the trailing month.
	pub async fn top_queries(&self, limit: u32) -> Result<Vec<TopQuery>> {
		let since = OffsetDateTime::now_utc() - Duration::days(TOP_QUERY_WINDOW_DAYS);
		let rows =
			query_log::top_queries(&self.db.pool, since, i64::from(limit.max(1))).await?;

		Ok(rows.into_iter().map(|row| TopQuery { query: row.query, count: row.count }).collect())
	}
}
