use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户奖券余额
/// (user_id, ticket_type_id) 唯一; quantity 永不为负,
/// 扣减一律走 "UPDATE ... WHERE quantity >= n" 条件更新
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticket_type_id: Uuid,
    pub quantity: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
