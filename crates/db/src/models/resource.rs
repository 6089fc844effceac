use serde::{Deserialize, Serialize};
use shared::types::ResourceId;

/// Row shape for `resources`. Provisioned out-of-band; the core only reads it.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ResourceRow {
    pub id: ResourceId,
    pub name: String,
}

impl From<ResourceRow> for domain::Resource {
    fn from(row: ResourceRow) -> Self {
        domain::Resource {
            id: row.id,
            name: row.name,
        }
    }
}
