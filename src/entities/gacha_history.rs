use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 抽卡履历, 只追加不修改
/// animation_index 为演出表中的 1 基序号 (动态命中取动态表, 否则取静态表)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gacha_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub gacha_id: Uuid,
    pub horse_id: Uuid,
    pub animation_index: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
