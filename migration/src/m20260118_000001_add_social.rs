use sea_orm_migration::prelude::*;

/// Gifts (用户间转赠记录: 奖券或马匹)
/// 发送时即转移资产, 拒收时整体回滚, status 只能从 sent 向前推进。
#[derive(DeriveIden)]
enum Gifts {
    Table,
    Id,
    FromUserId,
    ToUserId,
    Kind,
    TicketTypeId,
    HorseId,
    Quantity,
    Status,
    CreatedAt,
    RespondedAt,
}

/// Friendships (好友关系: 每对用户一条记录, user_id 为发起方)
#[derive(DeriveIden)]
enum Friendships {
    Table,
    Id,
    UserId,
    FriendUserId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Gifts::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Gifts::FromUserId).uuid().not_null())
                    .col(ColumnDef::new(Gifts::ToUserId).uuid().not_null())
                    .col(ColumnDef::new(Gifts::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Gifts::TicketTypeId).uuid().null())
                    .col(ColumnDef::new(Gifts::HorseId).uuid().null())
                    .col(ColumnDef::new(Gifts::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(Gifts::Status)
                            .string_len(16)
                            .not_null()
                            .default("sent"),
                    )
                    .col(
                        ColumnDef::new(Gifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Gifts::RespondedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gifts_to_user")
                    .table(Gifts::Table)
                    .col(Gifts::ToUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gifts_from_user")
                    .table(Gifts::Table)
                    .col(Gifts::FromUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Friendships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Friendships::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(Friendships::UserId).uuid().not_null())
                    .col(ColumnDef::new(Friendships::FriendUserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Friendships::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Friendships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Friendships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 同向唯一; 反向重复在服务层双向查重拦截
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_friendships_pair_unique")
                    .table(Friendships::Table)
                    .col(Friendships::UserId)
                    .col(Friendships::FriendUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Friendships::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Gifts::Table).to_owned())
            .await?;

        Ok(())
    }
}
