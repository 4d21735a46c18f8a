use crate::entities::{
    gacha_animation_entity as animations, gacha_entity as gachas, gacha_rate_entity as rates,
    horse_entity as horses, ticket_type_entity as ticket_types,
};
use crate::error::{AppError, AppResult};
use crate::models::{GachaListResponse, GachaSummaryResponse, RateEntryResponse};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

/// 内置静态抽卡机目录 (目录服务不可达/未配置时的兜底)
pub struct FallbackGacha {
    pub code: &'static str,
    pub name: &'static str,
    pub min_rarity: i32,
    pub max_rarity: i32,
    pub ticket_label: &'static str,
}

pub const FALLBACK_GACHAS: &[FallbackGacha] = &[
    FallbackGacha {
        code: "free",
        name: "フリー",
        min_rarity: 1,
        max_rarity: 3,
        ticket_label: "フリーチケット",
    },
    FallbackGacha {
        code: "basic",
        name: "ベーシック",
        min_rarity: 1,
        max_rarity: 6,
        ticket_label: "ベーシックチケット",
    },
    FallbackGacha {
        code: "epic",
        name: "エピック",
        min_rarity: 3,
        max_rarity: 8,
        ticket_label: "エピックチケット",
    },
    FallbackGacha {
        code: "premium",
        name: "プレミアム",
        min_rarity: 5,
        max_rarity: 10,
        ticket_label: "プレミアムチケット",
    },
    FallbackGacha {
        code: "ex",
        name: "EX",
        min_rarity: 7,
        max_rarity: 12,
        ticket_label: "EXチケット",
    },
];

/// 内置静态马匹池 (兜底抽取专用, ID 为非 UUID 的固定字符串)
pub struct FallbackHorse {
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: i32,
    pub card_image_url: Option<&'static str>,
}

pub const FALLBACK_HORSES: &[FallbackHorse] = &[
    FallbackHorse {
        id: "fallback-1",
        name: "ディープインパクト",
        rarity: 12,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-2",
        name: "ナリタブライアン",
        rarity: 11,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-3",
        name: "ダンスインザダーク",
        rarity: 9,
        card_image_url: Some("/assets/dance-in-the-dark.png"),
    },
    FallbackHorse {
        id: "fallback-4",
        name: "エルコンドルパサー",
        rarity: 8,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-5",
        name: "ナイスネイチャ",
        rarity: 6,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-6",
        name: "ツインターボ",
        rarity: 5,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-7",
        name: "ハルウララ",
        rarity: 3,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-8",
        name: "サクラバクシンオー",
        rarity: 7,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-9",
        name: "メイショウドトウ",
        rarity: 4,
        card_image_url: None,
    },
    FallbackHorse {
        id: "fallback-10",
        name: "地方馬A",
        rarity: 2,
        card_image_url: None,
    },
];

/// 内置静态演出表 (动态表未命中时的兜底, 顺序即履历中的演出序号)
pub struct StaticAnimation {
    pub key: &'static str,
    pub name: &'static str,
    pub min_rarity: i32,
    pub max_rarity: i32,
    pub duration_seconds: i32,
}

pub const FALLBACK_ANIMATIONS: &[StaticAnimation] = &[
    StaticAnimation {
        key: "g1",
        name: "G1レーススタート",
        min_rarity: 1,
        max_rarity: 6,
        duration_seconds: 5,
    },
    StaticAnimation {
        key: "stables",
        name: "厩舎トレーニング",
        min_rarity: 1,
        max_rarity: 3,
        duration_seconds: 4,
    },
    StaticAnimation {
        key: "birth",
        name: "名馬の誕生",
        min_rarity: 7,
        max_rarity: 9,
        duration_seconds: 6,
    },
    StaticAnimation {
        key: "arima",
        name: "有馬記念フィナーレ",
        min_rarity: 10,
        max_rarity: 12,
        duration_seconds: 8,
    },
];

/// 解析后的演出描述
/// index 为演出表中的 1 基序号 (动态命中取动态表序号, 否则取静态表序号)
#[derive(Debug, Clone)]
pub struct AnimationDescriptor {
    pub key: String,
    pub name: String,
    pub animation_type: String,
    pub asset_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub index: i32,
}

/// 稀有度 -> 演出解析
/// 先查动态表 (按 sort_order 排序后传入), 未命中再查静态表, 最后落到 g1
pub fn resolve_animation(rarity: i32, dynamic: &[animations::Model]) -> AnimationDescriptor {
    if let Some((idx, matched)) = dynamic
        .iter()
        .enumerate()
        .find(|(_, anim)| anim.covers(rarity))
    {
        return AnimationDescriptor {
            key: matched.key.clone(),
            name: matched.name.clone(),
            animation_type: matched.animation_type.clone(),
            asset_url: matched.asset_url.clone(),
            duration_seconds: matched.duration_seconds,
            index: idx as i32 + 1,
        };
    }

    let (idx, fallback) = FALLBACK_ANIMATIONS
        .iter()
        .enumerate()
        .find(|(_, anim)| rarity >= anim.min_rarity && rarity <= anim.max_rarity)
        .unwrap_or((0, &FALLBACK_ANIMATIONS[0]));

    AnimationDescriptor {
        key: fallback.key.to_string(),
        name: fallback.name.to_string(),
        animation_type: "css".to_string(),
        asset_url: None,
        duration_seconds: Some(fallback.duration_seconds),
        index: idx as i32 + 1,
    }
}

/// 别名表条目: canonical 为规范 code, aliases 由名称/奖券名组合生成
struct AliasEntry {
    canonical: String,
    aliases: Vec<String>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 去掉末尾的已知后缀 ("…ガチャ" / "…チケット" / "-gacha" / "-ticket")
fn strip_suffixes(s: &str) -> String {
    for suffix in ["ガチャ", "チケット", "-gacha", "-ticket"] {
        if let Some(stripped) = s.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    s.to_string()
}

fn build_alias_entry(code: &str, name: &str, ticket_label: &str) -> AliasEntry {
    let name = normalize(name);
    let label = normalize(ticket_label);
    let mut aliases = vec![
        name.clone(),
        format!("{name}ガチャ"),
        label.clone(),
        strip_suffixes(&label),
    ];
    aliases.dedup();
    AliasEntry {
        canonical: normalize(code),
        aliases,
    }
}

/// 按优先级解析: (1) canonical 精确 (2) 别名精确 (3) 请求去后缀后重复前两步
/// 返回首个命中的序号 (目录顺序决定平局胜者)
fn resolve_alias(entries: &[AliasEntry], requested: &str) -> Option<usize> {
    let req = normalize(requested);

    if let Some(i) = entries.iter().position(|e| e.canonical == req) {
        return Some(i);
    }
    if let Some(i) = entries.iter().position(|e| e.aliases.iter().any(|a| *a == req)) {
        return Some(i);
    }

    let stripped = strip_suffixes(&req);
    if stripped != req {
        if let Some(i) = entries.iter().position(|e| e.canonical == stripped) {
            return Some(i);
        }
        if let Some(i) = entries
            .iter()
            .position(|e| e.aliases.iter().any(|a| *a == stripped))
        {
            return Some(i);
        }
    }

    None
}

/// 目录解析结果: 线上目录或静态兜底, 每次请求解析一次
pub enum ResolvedCatalog {
    Live {
        gacha: gachas::Model,
        ticket_type: ticket_types::Model,
    },
    Fallback {
        def: &'static FallbackGacha,
    },
}

#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 解析外部标识到抽卡机定义
    /// 线上目录未命中时退到静态目录, 两边都未命中返回 NotFound
    pub async fn resolve(&self, requested: &str) -> AppResult<ResolvedCatalog> {
        let live = self.load_live_definitions().await.unwrap_or_else(|e| {
            // 目录库不可达时按空目录处理, 由静态兜底接住
            log::warn!("Failed to load live gacha catalog: {e}");
            Vec::new()
        });

        let entries: Vec<AliasEntry> = live
            .iter()
            .map(|(g, t)| build_alias_entry(&t.code, &g.name, &t.name))
            .collect();

        if let Some(i) = resolve_alias(&entries, requested) {
            let (gacha, ticket_type) = live.into_iter().nth(i).expect("index from resolve_alias");
            return Ok(ResolvedCatalog::Live { gacha, ticket_type });
        }

        let static_entries: Vec<AliasEntry> = FALLBACK_GACHAS
            .iter()
            .map(|d| build_alias_entry(d.code, d.name, d.ticket_label))
            .collect();

        if let Some(i) = resolve_alias(&static_entries, requested) {
            return Ok(ResolvedCatalog::Fallback {
                def: &FALLBACK_GACHAS[i],
            });
        }

        Err(AppError::NotFound(format!("Unknown gacha: {requested}")))
    }

    /// 线上目录一览 (活动中的抽卡机, 按 sort_order)
    pub async fn list(&self) -> AppResult<GachaListResponse> {
        let live = self.load_live_definitions().await.unwrap_or_else(|e| {
            log::warn!("Failed to load live gacha catalog: {e}");
            Vec::new()
        });

        if live.is_empty() {
            let gachas = FALLBACK_GACHAS
                .iter()
                .enumerate()
                .map(|(i, d)| GachaSummaryResponse {
                    code: d.code.to_string(),
                    name: d.name.to_string(),
                    min_rarity: d.min_rarity,
                    max_rarity: d.max_rarity,
                    ticket_label: d.ticket_label.to_string(),
                    sort_order: i as i32,
                })
                .collect();
            return Ok(GachaListResponse {
                gachas,
                fallback: true,
            });
        }

        let gachas = live
            .into_iter()
            .map(|(g, t)| GachaSummaryResponse {
                code: t.code,
                name: g.name,
                min_rarity: g.min_rarity,
                max_rarity: g.max_rarity,
                ticket_label: t.name,
                sort_order: g.sort_order,
            })
            .collect();

        Ok(GachaListResponse {
            gachas,
            fallback: false,
        })
    }

    /// 指定抽卡机的概率池展示
    /// 线上命中返回配置的权重; 静态兜底返回均等概率 (兜底抽取即等概率)
    pub async fn rates(&self, requested: &str) -> AppResult<Vec<RateEntryResponse>> {
        match self.resolve(requested).await? {
            ResolvedCatalog::Live { gacha, .. } => {
                let pool = self.load_pool(&self.pool, gacha.id).await?;
                Ok(pool
                    .into_iter()
                    .map(|(horse, rate)| RateEntryResponse {
                        name: horse.name,
                        rarity: horse.rarity,
                        rate,
                    })
                    .collect())
            }
            ResolvedCatalog::Fallback { def } => {
                let pool = fallback_pool(def.min_rarity, def.max_rarity);
                let share = 100.0 / pool.len() as f64;
                Ok(pool
                    .iter()
                    .map(|h| RateEntryResponse {
                        name: h.name.to_string(),
                        rarity: h.rarity,
                        rate: share,
                    })
                    .collect())
            }
        }
    }

    /// 加载抽卡机的加权池 (item x 权重); 非活动马匹剔除
    pub async fn load_pool<C: ConnectionTrait>(
        &self,
        conn: &C,
        gacha_id: Uuid,
    ) -> AppResult<Vec<(horses::Model, f64)>> {
        let rate_rows = rates::Entity::find()
            .filter(rates::Column::GachaId.eq(gacha_id))
            .all(conn)
            .await?;

        let horse_ids: Vec<Uuid> = rate_rows.iter().map(|r| r.horse_id).collect();
        if horse_ids.is_empty() {
            return Ok(Vec::new());
        }

        let horse_rows = horses::Entity::find()
            .filter(horses::Column::Id.is_in(horse_ids))
            .filter(horses::Column::IsActive.eq(true))
            .all(conn)
            .await?;
        let by_id: HashMap<Uuid, horses::Model> =
            horse_rows.into_iter().map(|h| (h.id, h)).collect();

        Ok(rate_rows
            .into_iter()
            .filter_map(|r| by_id.get(&r.horse_id).cloned().map(|h| (h, r.rate)))
            .collect())
    }

    /// 加载演出映射表 (按 sort_order, 序号即履历中的 1 基演出序号)
    pub async fn load_animations<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<Vec<animations::Model>> {
        let list = animations::Entity::find()
            .order_by_asc(animations::Column::SortOrder)
            .all(conn)
            .await?;
        Ok(list)
    }

    async fn load_live_definitions(
        &self,
    ) -> AppResult<Vec<(gachas::Model, ticket_types::Model)>> {
        let defs = gachas::Entity::find()
            .filter(gachas::Column::IsActive.eq(true))
            .order_by_asc(gachas::Column::SortOrder)
            .all(&self.pool)
            .await?;

        let type_rows = ticket_types::Entity::find().all(&self.pool).await?;
        let types_by_id: HashMap<Uuid, ticket_types::Model> =
            type_rows.into_iter().map(|t| (t.id, t)).collect();

        Ok(defs
            .into_iter()
            .filter_map(|g| types_by_id.get(&g.ticket_type_id).cloned().map(|t| (g, t)))
            .collect())
    }
}

/// 静态池按稀有度区间过滤; 区间过滤后为空时退回整个静态池
pub fn fallback_pool(min_rarity: i32, max_rarity: i32) -> Vec<&'static FallbackHorse> {
    let filtered: Vec<&FallbackHorse> = FALLBACK_HORSES
        .iter()
        .filter(|h| h.rarity >= min_rarity && h.rarity <= max_rarity)
        .collect();
    if filtered.is_empty() {
        FALLBACK_HORSES.iter().collect()
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_entries() -> Vec<AliasEntry> {
        FALLBACK_GACHAS
            .iter()
            .map(|d| build_alias_entry(d.code, d.name, d.ticket_label))
            .collect()
    }

    #[test]
    fn test_resolve_canonical_code() {
        let entries = static_entries();
        assert_eq!(resolve_alias(&entries, "premium"), Some(3));
        assert_eq!(resolve_alias(&entries, "free"), Some(0));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let entries = static_entries();
        assert_eq!(resolve_alias(&entries, "PREMIUM"), Some(3));
        assert_eq!(resolve_alias(&entries, " Basic "), Some(1));
    }

    #[test]
    fn test_resolve_display_name_and_suffixes() {
        let entries = static_entries();
        // 显示名本体 / 带ガチャ后缀 / 奖券名
        assert_eq!(resolve_alias(&entries, "プレミアム"), Some(3));
        assert_eq!(resolve_alias(&entries, "プレミアムガチャ"), Some(3));
        assert_eq!(resolve_alias(&entries, "プレミアムチケット"), Some(3));
        // canonical + localized/romanized suffix
        assert_eq!(resolve_alias(&entries, "premiumガチャ"), Some(3));
        assert_eq!(resolve_alias(&entries, "premium-gacha"), Some(3));
        assert_eq!(resolve_alias(&entries, "premium-ticket"), Some(3));
    }

    #[test]
    fn test_resolve_unknown_returns_none() {
        let entries = static_entries();
        assert_eq!(resolve_alias(&entries, "legendary"), None);
        assert_eq!(resolve_alias(&entries, ""), None);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let entries = vec![
            build_alias_entry("dup", "ダブり", "ダブりチケット"),
            build_alias_entry("dup", "ダブり", "ダブりチケット"),
        ];
        assert_eq!(resolve_alias(&entries, "dup"), Some(0));
        assert_eq!(resolve_alias(&entries, "ダブりガチャ"), Some(0));
    }

    #[test]
    fn test_animation_static_fallback_ranges() {
        let anim = resolve_animation(2, &[]);
        assert_eq!(anim.key, "g1");
        assert_eq!(anim.index, 1);

        let anim = resolve_animation(8, &[]);
        assert_eq!(anim.key, "birth");
        assert_eq!(anim.index, 3);

        let anim = resolve_animation(12, &[]);
        assert_eq!(anim.key, "arima");
        assert_eq!(anim.index, 4);
    }

    #[test]
    fn test_animation_out_of_range_rarity_defaults_to_first() {
        // 任何区间都未命中时落到静态表首项 (g1)
        let anim = resolve_animation(0, &[]);
        assert_eq!(anim.key, "g1");
        let anim = resolve_animation(99, &[]);
        assert_eq!(anim.key, "g1");
    }

    #[test]
    fn test_fallback_pool_rarity_filter() {
        let pool = fallback_pool(5, 10);
        assert!(!pool.is_empty());
        assert!(pool.iter().all(|h| h.rarity >= 5 && h.rarity <= 10));

        // 过滤后为空时退回整个静态池
        let pool = fallback_pool(100, 200);
        assert_eq!(pool.len(), FALLBACK_HORSES.len());
    }
}
