use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// 收藏条目 (联表马匹信息)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionEntryResponse {
    pub horse_id: String,
    pub name: String,
    pub rarity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silhouette_image_url: Option<String>,
    pub quantity: i64,
    pub first_acquired_at: DateTime<Utc>,
}

/// 收藏总览: 条目 + 完成度 (去重所持 / 全部现役马匹)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionResponse {
    pub entries: Vec<CollectionEntryResponse>,
    pub owned_distinct: i64,
    pub total_horses: i64,
    pub completion: f64,
}
