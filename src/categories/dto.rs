use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::repo::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_response_uses_camel_case() {
        let response = CategoryResponse {
            id: Uuid::new_v4(),
            name: "Bills".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("Bills"));
    }
}
