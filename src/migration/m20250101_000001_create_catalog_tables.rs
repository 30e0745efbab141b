use sea_orm_migration::prelude::*;
use tracing::info;

use crate::price::Price;
use crate::validation::{
    EMAIL_MAX_LEN, IMAGE_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN, USERNAME_MAX_LEN,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    ParentId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    CategoryId,
    CreatedBy,
    Title,
    Author,
    Description,
    Image,
    Price,
    InStock,
    IsActive,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum ShippingAddresses {
    Table,
    Id,
    Name,
    Address,
    City,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CustomerName,
    CustomerEmail,
    OrderDate,
    ShippingAddressId,
}

#[derive(DeriveIden)]
enum Sellers {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    IsActive,
}

#[derive(DeriveIden)]
enum SellerProducts {
    Table,
    Id,
    SellerId,
    ProductId,
}

fn uuid_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

fn name_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .string_len(NAME_MAX_LEN as u32)
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Referenced tables first so foreign keys resolve.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid_pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(USERNAME_MAX_LEN as u32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(EMAIL_MAX_LEN as u32)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(uuid_pk(Categories::Id))
                    .col(name_col(Categories::Name))
                    .col(ColumnDef::new(Categories::ParentId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent_id")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(uuid_pk(Products::Id))
                    .col(ColumnDef::new(Products::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Products::CreatedBy).uuid().not_null())
                    .col(name_col(Products::Title))
                    .col(
                        ColumnDef::new(Products::Author)
                            .string_len(NAME_MAX_LEN as u32)
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(Products::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Products::Image)
                            .string_len(IMAGE_MAX_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::Price)
                            .integer()
                            .not_null()
                            .check(Expr::col(Products::Price).between(
                                Price::ZERO.cents(),
                                Price::MAX.cents(),
                            )),
                    )
                    .col(
                        ColumnDef::new(Products::InStock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::Updated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_created_by")
                            .from(Products::Table, Products::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShippingAddresses::Table)
                    .if_not_exists()
                    .col(uuid_pk(ShippingAddresses::Id))
                    .col(name_col(ShippingAddresses::Name))
                    .col(ColumnDef::new(ShippingAddresses::Address).text().not_null())
                    .col(name_col(ShippingAddresses::City))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(uuid_pk(Orders::Id))
                    .col(name_col(Orders::CustomerName))
                    .col(
                        ColumnDef::new(Orders::CustomerEmail)
                            .string_len(EMAIL_MAX_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::ShippingAddressId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_shipping_address_id")
                            .from(Orders::Table, Orders::ShippingAddressId)
                            .to(ShippingAddresses::Table, ShippingAddresses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(uuid_pk(Sellers::Id))
                    .col(name_col(Sellers::Name))
                    .col(
                        ColumnDef::new(Sellers::Email)
                            .string_len(EMAIL_MAX_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sellers::PhoneNumber)
                            .string_len(PHONE_MAX_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sellers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SellerProducts::Table)
                    .if_not_exists()
                    .col(uuid_pk(SellerProducts::Id))
                    .col(ColumnDef::new(SellerProducts::SellerId).uuid().not_null())
                    .col(ColumnDef::new(SellerProducts::ProductId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_products_seller_id")
                            .from(SellerProducts::Table, SellerProducts::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_products_product_id")
                            .from(SellerProducts::Table, SellerProducts::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        create_indexes(manager).await?;
        info!("catalog tables created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dependents first.
        manager
            .drop_table(Table::drop().table(SellerProducts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sellers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShippingAddresses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

async fn create_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let indexes = [
        Index::create()
            .name("idx_categories_name")
            .table(Categories::Table)
            .col(Categories::Name)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_categories_parent_id")
            .table(Categories::Table)
            .col(Categories::ParentId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_category_id")
            .table(Products::Table)
            .col(Products::CategoryId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_created_by")
            .table(Products::Table)
            .col(Products::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_orders_shipping_address_id")
            .table(Orders::Table)
            .col(Orders::ShippingAddressId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_seller_products_product_id")
            .table(SellerProducts::Table)
            .col(SellerProducts::ProductId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_seller_products_seller_product")
            .table(SellerProducts::Table)
            .col(SellerProducts::SellerId)
            .col(SellerProducts::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in indexes {
        manager.create_index(stmt).await?;
    }
    Ok(())
}
