use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 登录奖励领取记录, 只追加
/// bonus_date 为窗口起点日期, (user_id, bonus_date) 唯一约束裁决并发领取
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "login_bonus_claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub bonus_date: Date,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
