use super::IEventRepo;
use chaincal_domain::{Event, NewEvent};
use sqlx::{FromRow, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    id: i64,
    contract_address: String,
    event_signature: String,
    event_args: serde_json::Value,
    next_timestamp: i64,
    created: i64,
    updated: i64,
}

impl From<EventRaw> for Event {
    fn from(e: EventRaw) -> Self {
        Self {
            id: e.id,
            contract_address: e.contract_address,
            event_signature: e.event_signature,
            event_args: e.event_args,
            next_timestamp: e.next_timestamp,
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &NewEvent) -> anyhow::Result<Event> {
        let row = sqlx::query_as::<_, EventRaw>(
            r#"
            INSERT INTO events(
                contract_address,
                event_signature,
                event_args,
                next_timestamp,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&e.contract_address)
        .bind(&e.event_signature)
        .bind(&e.event_args)
        .bind(e.next_timestamp)
        .bind(e.created)
        .bind(e.updated)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find(&self, event_id: i64) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|e| e.into())
    }

    async fn find_due_before(&self, before_inc: i64) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE next_timestamp <= $1
            "#,
        )
        .bind(before_inc)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    async fn find_upcoming(&self, after_inc: i64, limit: i64) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE next_timestamp >= $1
            ORDER BY next_timestamp ASC
            LIMIT $2
            "#,
        )
        .bind(after_inc)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            ORDER BY created DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|e| e.into()).collect())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM events
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn set_next_timestamp(
        &self,
        event_id: i64,
        next_timestamp: i64,
        updated: i64,
    ) -> anyhow::Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRaw>(
            r#"
            UPDATE events SET
                next_timestamp = $2,
                updated = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(next_timestamp)
        .bind(updated)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|e| e.into()))
    }

    async fn delete(&self, event_id: i64) -> Option<Event> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            DELETE FROM events
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|e| e.into())
    }
}
