use crate::models::ResourceRow;
use shared::types::ResourceId;
use sqlx::PgPool;

pub struct ResourceRepository;

impl ResourceRepository {
    pub async fn find_by_id(
        pool: &PgPool,
        resource_id: ResourceId,
    ) -> Result<Option<ResourceRow>, sqlx::Error> {
        sqlx::query_as::<_, ResourceRow>("SELECT id, name FROM resources WHERE id = $1")
            .bind(resource_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<ResourceRow, sqlx::Error> {
        sqlx::query_as::<_, ResourceRow>(
            "INSERT INTO resources (id, name) VALUES (gen_random_uuid(), $1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
