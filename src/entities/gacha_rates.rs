use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽卡概率池条目: 抽卡机 x 马匹 -> 权重
/// rate >= 0, 权重 0 的条目永远不会被抽中; 权重总和不要求等于 100
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gacha_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gacha_id: Uuid,
    pub horse_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
