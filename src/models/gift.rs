use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{GiftKind, GiftStatus};

/// 转赠请求
/// kind=ticket 时需要 ticket_code, kind=horse 时需要 horse_id
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SendGiftRequest {
    pub to_user_id: Uuid,
    pub kind: GiftKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horse_id: Option<Uuid>,
    pub quantity: i64,
}

/// 转赠应答动作
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GiftAction {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RespondGiftRequest {
    pub id: Uuid,
    pub action: GiftAction,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RespondGiftResponse {
    pub status: GiftStatus,
}

/// 转赠记录 (展示用, 联表奖券/马匹名称)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GiftResponse {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub kind: GiftKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horse_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horse_rarity: Option<i32>,
    pub quantity: i64,
    pub status: GiftStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

/// 收发分组的转赠一览
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GiftListResponse {
    pub incoming: Vec<GiftResponse>,
    pub outgoing: Vec<GiftResponse>,
}
