use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    Name,
    Description,
    CouponType,
    Value,
    MinimumOrderAmount,
    MaximumDiscount,
    ValidFrom,
    ValidUntil,
    UsageLimit,
    UsedCount,
    PerUserLimit,
    ApplicableCategories,
    ApplicableProducts,
    ExcludedProducts,
    ApplicableUsers,
    IsActive,
    IsFirstTimeUser,
    IsNewUser,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 优惠券表
/// - code 统一存储为大写，唯一
/// - usage_limit 为 NULL 表示不限总次数
/// - 四个 id 列表以 jsonb 数组保存，空数组表示不限制
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("coupon_type"))
                    .values(vec![
                        Alias::new("percentage"),
                        Alias::new("fixed"),
                        Alias::new("free_shipping"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Coupons::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Coupons::Description).string_len(500).null())
                    .col(
                        ColumnDef::new(Coupons::CouponType)
                            .custom(Alias::new("coupon_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::Value).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Coupons::MinimumOrderAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Coupons::MaximumDiscount)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::UsageLimit).big_integer().null())
                    .col(
                        ColumnDef::new(Coupons::UsedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Coupons::PerUserLimit)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Coupons::ApplicableCategories)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Coupons::ApplicableProducts)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Coupons::ExcludedProducts)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Coupons::ApplicableUsers)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Coupons::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Coupons::IsFirstTimeUser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Coupons::IsNewUser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Coupons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Coupons::UpdatedAt)
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
                    .name("idx_coupons_code_unique")
                    .table(Coupons::Table)
                    .col(Coupons::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 可用券查询: is_active + 有效期窗口
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_coupons_active_window")
                    .table(Coupons::Table)
                    .col(Coupons::IsActive)
                    .col(Coupons::ValidFrom)
                    .col(Coupons::ValidUntil)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Coupons::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("coupon_type")).to_owned())
            .await?;
        Ok(())
    }
}
