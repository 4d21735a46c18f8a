use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户收藏条目
/// first_acquired_at 只在首次获得时写入, 之后的获得只累加数量
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub horse_id: Uuid,
    pub quantity: i64,
    pub first_acquired_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
