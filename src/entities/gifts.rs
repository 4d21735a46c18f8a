use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 转赠内容种类
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum GiftKind {
    #[sea_orm(string_value = "ticket")]
    Ticket,
    #[sea_orm(string_value = "horse")]
    Horse,
}

impl std::fmt::Display for GiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GiftKind::Ticket => write!(f, "ticket"),
            GiftKind::Horse => write!(f, "horse"),
        }
    }
}

/// 转赠状态, 只从 sent 向前推进
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum GiftStatus {
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
}

impl std::fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GiftStatus::Sent => write!(f, "sent"),
            GiftStatus::Accepted => write!(f, "accepted"),
            GiftStatus::Declined => write!(f, "declined"),
        }
    }
}

/// 转赠记录
/// 发送时即转移资产; decline 时整体回滚 (接收方扣减以 0 为下限)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub kind: GiftKind,
    pub ticket_type_id: Option<Uuid>,
    pub horse_id: Option<Uuid>,
    pub quantity: i64,
    pub status: GiftStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
