use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::ticket_type_entity as ticket_types;

/// 用户单一奖券种类的余额
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketBalanceResponse {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_token: Option<String>,
    pub sort_order: i32,
    pub quantity: i64,
}

impl TicketBalanceResponse {
    pub fn from_type(m: ticket_types::Model, quantity: i64) -> Self {
        TicketBalanceResponse {
            code: m.code,
            name: m.name,
            color_token: m.color,
            sort_order: m.sort_order,
            quantity,
        }
    }
}

/// 登录奖励状态 (GET)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BonusStatusResponse {
    pub claimed: bool,
    pub next_reset_at: DateTime<Utc>,
}

/// 登录奖励领取结果 (POST)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BonusClaimResponse {
    /// 发放的奖券种类 code
    pub ticket: String,
    pub amount: i64,
    pub new_balance: i64,
    pub next_reset_at: DateTime<Utc>,
    pub message: String,
}
