use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::{Result, models::QueryCount};

pub async fn append<'e, E>(executor: E, query: &str, user_id: Option<&str>) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO search_queries (query, user_id)
VALUES ($1, $2)",
	)
	.bind(query)
	.bind(user_id)
	.execute(executor)
	.await?;

	Ok(())
}

/// Most frequent logged queries since `since`, ties broken alphabetically.
pub async fn top_queries<'e, E>(
	executor: E,
	since: OffsetDateTime,
	limit: i64,
) -> Result<Vec<QueryCount>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, QueryCount>(
		"\
SELECT query, count(*) AS count
FROM search_queries
WHERE created_at >= $1
GROUP BY query
ORDER BY count DESC, query
LIMIT $2",
	)
	.bind(since)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
