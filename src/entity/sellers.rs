use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sellers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seller_products::Entity")]
    SellerProducts,
}

impl Related<super::seller_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerProducts.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        super::seller_products::Relation::Products.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::seller_products::Relation::Sellers.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
