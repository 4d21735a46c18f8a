use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Users (外部认证目录的本地镜像, 用于社交搜索/展示)
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    CreatedAt,
}

/// Ticket Types (奖券种类配置表)
#[derive(DeriveIden)]
enum TicketTypes {
    Table,
    Id,
    Code,
    Name,
    Color,
    SortOrder,
    CreatedAt,
}

/// Horses (收藏马匹目录)
#[derive(DeriveIden)]
enum Horses {
    Table,
    Id,
    Name,
    NameEn,
    Rarity,
    Description,
    CardImageUrl,
    SilhouetteImageUrl,
    IsActive,
    CreatedAt,
}

/// Gachas (抽卡机配置表)
#[derive(DeriveIden)]
enum Gachas {
    Table,
    Id,
    Name,
    TicketTypeId,
    MinRarity,
    MaxRarity,
    IsActive,
    SortOrder,
    CreatedAt,
}

/// Gacha Rates (抽卡概率池: 抽卡机 x 马匹 -> 权重)
#[derive(DeriveIden)]
enum GachaRates {
    Table,
    Id,
    GachaId,
    HorseId,
    Rate,
}

/// Gacha Animations (稀有度 -> 抽卡演出映射表)
#[derive(DeriveIden)]
enum GachaAnimations {
    Table,
    Id,
    Key,
    Name,
    MinRarity,
    MaxRarity,
    AnimationType,
    AssetUrl,
    DurationSeconds,
    IsActive,
    SortOrder,
    CreatedAt,
}

/// User Tickets (用户奖券余额)
#[derive(DeriveIden)]
enum UserTickets {
    Table,
    Id,
    UserId,
    TicketTypeId,
    Quantity,
    UpdatedAt,
}

/// User Collections (用户收藏: 所持数量 + 首次获得时间)
#[derive(DeriveIden)]
enum UserCollections {
    Table,
    Id,
    UserId,
    HorseId,
    Quantity,
    FirstAcquiredAt,
}

/// Gacha History (抽卡履历, 只追加不修改)
#[derive(DeriveIden)]
enum GachaHistory {
    Table,
    Id,
    UserId,
    GachaId,
    HorseId,
    AnimationIndex,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户镜像表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::DisplayName).string_len(255).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email_unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 奖券种类表
        manager
            .create_table(
                Table::create()
                    .table(TicketTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(TicketTypes::Code).string_len(32).not_null())
                    .col(ColumnDef::new(TicketTypes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TicketTypes::Color).string_len(64).null())
                    .col(
                        ColumnDef::new(TicketTypes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TicketTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // code 唯一 (抽卡接口以 code 定位奖券种类)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ticket_types_code_unique")
                    .table(TicketTypes::Table)
                    .col(TicketTypes::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 马匹目录表
        manager
            .create_table(
                Table::create()
                    .table(Horses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Horses::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Horses::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Horses::NameEn).string_len(255).null())
                    .col(ColumnDef::new(Horses::Rarity).integer().not_null())
                    .col(ColumnDef::new(Horses::Description).text().null())
                    .col(ColumnDef::new(Horses::CardImageUrl).string_len(1024).null())
                    .col(
                        ColumnDef::new(Horses::SilhouetteImageUrl)
                            .string_len(1024)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Horses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Horses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 抽卡机表
        manager
            .create_table(
                Table::create()
                    .table(Gachas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Gachas::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Gachas::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Gachas::TicketTypeId).uuid().not_null())
                    .col(ColumnDef::new(Gachas::MinRarity).integer().not_null())
                    .col(ColumnDef::new(Gachas::MaxRarity).integer().not_null())
                    .col(
                        ColumnDef::new(Gachas::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Gachas::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Gachas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Gachas::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_gachas_ticket_type")
                            .from_tbl(Gachas::Table)
                            .from_col(Gachas::TicketTypeId)
                            .to_tbl(TicketTypes::Table)
                            .to_col(TicketTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 概率池表
        manager
            .create_table(
                Table::create()
                    .table(GachaRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GachaRates::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(GachaRates::GachaId).uuid().not_null())
                    .col(ColumnDef::new(GachaRates::HorseId).uuid().not_null())
                    .col(
                        ColumnDef::new(GachaRates::Rate)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gacha_rates_gacha")
                    .table(GachaRates::Table)
                    .col(GachaRates::GachaId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(GachaRates::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_gacha_rates_gacha")
                            .from_tbl(GachaRates::Table)
                            .from_col(GachaRates::GachaId)
                            .to_tbl(Gachas::Table)
                            .to_col(Gachas::Id),
                    )
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_gacha_rates_horse")
                            .from_tbl(GachaRates::Table)
                            .from_col(GachaRates::HorseId)
                            .to_tbl(Horses::Table)
                            .to_col(Horses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 演出映射表
        manager
            .create_table(
                Table::create()
                    .table(GachaAnimations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GachaAnimations::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(GachaAnimations::Key).string_len(64).not_null())
                    .col(
                        ColumnDef::new(GachaAnimations::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::MinRarity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::MaxRarity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::AnimationType)
                            .string_len(16)
                            .not_null()
                            .default("css"),
                    )
                    .col(ColumnDef::new(GachaAnimations::AssetUrl).string_len(1024).null())
                    .col(
                        ColumnDef::new(GachaAnimations::DurationSeconds)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GachaAnimations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gacha_animations_key_unique")
                    .table(GachaAnimations::Table)
                    .col(GachaAnimations::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 用户奖券余额表
        manager
            .create_table(
                Table::create()
                    .table(UserTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserTickets::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(UserTickets::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserTickets::TicketTypeId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserTickets::Quantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserTickets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // (user_id, ticket_type_id) 唯一, 余额 upsert 依赖该约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_tickets_user_type_unique")
                    .table(UserTickets::Table)
                    .col(UserTickets::UserId)
                    .col(UserTickets::TicketTypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 余额永不为负 (条件扣减之外的第二道防线)
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "ALTER TABLE user_tickets ADD CONSTRAINT chk_user_tickets_quantity_non_negative CHECK (quantity >= 0);"
                    .to_string(),
            ))
            .await?;

        // 用户收藏表
        manager
            .create_table(
                Table::create()
                    .table(UserCollections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserCollections::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(UserCollections::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserCollections::HorseId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserCollections::Quantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserCollections::FirstAcquiredAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_collections_user_horse_unique")
                    .table(UserCollections::Table)
                    .col(UserCollections::UserId)
                    .col(UserCollections::HorseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(UserCollections::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_user_collections_horse")
                            .from_tbl(UserCollections::Table)
                            .from_col(UserCollections::HorseId)
                            .to_tbl(Horses::Table)
                            .to_col(Horses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 抽卡履历表 (不加 ON DELETE CASCADE, 保证履历保留)
        manager
            .create_table(
                Table::create()
                    .table(GachaHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GachaHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(GachaHistory::UserId).uuid().not_null())
                    .col(ColumnDef::new(GachaHistory::GachaId).uuid().not_null())
                    .col(ColumnDef::new(GachaHistory::HorseId).uuid().not_null())
                    .col(
                        ColumnDef::new(GachaHistory::AnimationIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GachaHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gacha_history_user")
                    .table(GachaHistory::Table)
                    .col(GachaHistory::UserId)
                    .to_owned(),
            )
            .await?;

        // 初始化奖券种类与演出映射
        // 抽卡机与马匹目录由管理端维护, 不在迁移中播种 (缺失时走静态兜底目录)
        let conn = manager.get_connection();
        let seed_ticket_types = r#"
INSERT INTO ticket_types (code, name, color, sort_order)
VALUES
 ('free', 'フリーチケット', 'gacha-free', 0),
 ('basic', 'ベーシックチケット', 'gacha-basic', 1),
 ('epic', 'エピックチケット', 'gacha-epic', 2),
 ('premium', 'プレミアムチケット', 'gacha-premium', 3),
 ('ex', 'EXチケット', 'gacha-ex', 4)
ON CONFLICT (code) DO NOTHING;
"#;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            seed_ticket_types.to_string(),
        ))
        .await?;

        let seed_animations = r#"
INSERT INTO gacha_animations (key, name, min_rarity, max_rarity, animation_type, duration_seconds, sort_order)
VALUES
 ('g1', 'G1レーススタート', 1, 6, 'css', 5, 0),
 ('stables', '厩舎トレーニング', 1, 3, 'css', 4, 1),
 ('birth', '名馬の誕生', 7, 9, 'css', 6, 2),
 ('arima', '有馬記念フィナーレ', 10, 12, 'css', 8, 3)
ON CONFLICT (key) DO NOTHING;
"#;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            seed_animations.to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序: 依赖方 -> 被依赖方
        for table in [
            Table::drop().if_exists().table(GachaHistory::Table).to_owned(),
            Table::drop()
                .if_exists()
                .table(UserCollections::Table)
                .to_owned(),
            Table::drop().if_exists().table(UserTickets::Table).to_owned(),
            Table::drop()
                .if_exists()
                .table(GachaAnimations::Table)
                .to_owned(),
            Table::drop().if_exists().table(GachaRates::Table).to_owned(),
            Table::drop().if_exists().table(Gachas::Table).to_owned(),
            Table::drop().if_exists().table(Horses::Table).to_owned(),
            Table::drop().if_exists().table(TicketTypes::Table).to_owned(),
            Table::drop().if_exists().table(Users::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }

        Ok(())
    }
}
