use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 稀有度 -> 抽卡演出映射
/// 动态表缺失或未命中时回退到内置静态演出表
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gacha_animations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub min_rarity: i32,
    pub max_rarity: i32,
    pub animation_type: String,
    pub asset_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 该演出是否覆盖指定稀有度
    pub fn covers(&self, rarity: i32) -> bool {
        self.is_active && rarity >= self.min_rarity && rarity <= self.max_rarity
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
