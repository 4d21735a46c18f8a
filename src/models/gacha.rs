use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 抽卡请求体
/// repeat 静默收敛到 [1, 10] (与原服务行为一致)
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PullRequest {
    pub repeat: Option<i64>,
}

/// 单次抽取结果 (含解析后的演出描述)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResultItem {
    /// 马匹ID; 兜底池条目为静态字符串ID (如 "fallback-1")
    pub horse_id: String,
    pub horse: String,
    pub rarity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_image_url: Option<String>,
    /// 演出 key (g1 / stables / birth / arima 等)
    pub animation: String,
    pub animation_name: String,
    pub animation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_asset_url: Option<String>,
    pub is_new: bool,
}

/// 抽卡响应
/// 目录未命中时走兜底抽取: HTTP 200 + warning, 不产生任何持久化变更
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PullResponse {
    /// 消耗的奖券名称
    pub ticket: String,
    pub results: Vec<DrawResultItem>,
    /// 剩余余额; 兜底抽取时无余额变动, 为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// 是否为兜底结果 (让调用方能区分降级与正常)
    pub fallback: bool,
}

/// 抽卡机摘要 (目录列表用)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GachaSummaryResponse {
    /// 外部标识 = 奖券种类 code
    pub code: String,
    pub name: String,
    pub min_rarity: i32,
    pub max_rarity: i32,
    pub ticket_label: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GachaListResponse {
    pub gachas: Vec<GachaSummaryResponse>,
    /// 目录为空或不可达时为 true, 返回内置静态目录
    pub fallback: bool,
}

/// 概率池展示条目
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateEntryResponse {
    pub name: String,
    pub rarity: i32,
    pub rate: f64,
}

/// 抽卡履历查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// 抽卡履历条目 (马匹/抽卡机名称为查询时联表快照)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GachaHistoryResponse {
    pub id: String,
    pub gacha_name: String,
    pub horse_name: String,
    pub rarity: i32,
    pub animation_index: i32,
    pub created_at: DateTime<Utc>,
}

pub type GachaHistoryPageResponse = super::PaginatedResponse<GachaHistoryResponse>;
