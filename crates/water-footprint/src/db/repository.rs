use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{CreateReading, Reading};

#[derive(Clone)]
pub struct ReadingRepository {
    pool: SqlitePool,
}

impl ReadingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, reading: &CreateReading) -> Result<Reading> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO readings
                (timestamp, device_id, flow_rate_lpm, total_liters, reading_seconds,
                 family_size, appliances, usage_hours, primary_appliance, water_saving_device)
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(&reading.device_id)
        .bind(reading.flow_rate_lpm)
        .bind(reading.total_liters.unwrap_or(0.0))
        .bind(reading.reading_seconds)
        .bind(reading.family_size)
        .bind(reading.appliances)
        .bind(reading.usage_hours)
        .bind(&reading.primary_appliance)
        .bind(reading.water_saving_device)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Reading>> {
        let row = sqlx::query_as::<_, Reading>("SELECT * FROM readings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Newest readings first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Reading>> {
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT * FROM readings
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn repository() -> ReadingRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        ReadingRepository::new(pool)
    }

    #[tokio::test]
    async fn test_repository_create() {
        let repo = repository().await;
        let reading = CreateReading::new("esp32_01", 2.5)
            .with_household(4, 3, 6.0)
            .with_primary_appliance("Sink")
            .with_water_saving_device(true);

        let created = repo.create(&reading).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.device_id, "esp32_01");
        assert_eq!(created.flow_rate_lpm, 2.5);
        assert_eq!(created.total_liters, 0.0);
        assert_eq!(created.family_size, Some(4));
        assert_eq!(created.primary_appliance.as_deref(), Some("Sink"));
        assert_eq!(created.water_saving_device, Some(true));
    }

    #[tokio::test]
    async fn test_repository_find_by_id() {
        let repo = repository().await;
        let created = repo
            .create(&CreateReading::new("esp32_02", 1.0).with_total_liters(7.24))
            .await
            .unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.total_liters, 7.24);

        assert!(repo.find_by_id(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_repository_list_recent_newest_first() {
        let repo = repository().await;
        for i in 0..5 {
            repo.create(&CreateReading::new(format!("dev-{i}"), i as f64))
                .await
                .unwrap();
        }

        let recent = repo.list_recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].device_id, "dev-4");
        assert_eq!(recent[2].device_id, "dev-2");
        assert_eq!(repo.list_recent(100).await.unwrap().len(), 5);
    }
}
