pub mod categories;
pub mod orders;
pub mod products;
pub mod seller_products;
pub mod sellers;
pub mod shipping_addresses;
pub mod users;

pub use categories::Entity as Categories;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use seller_products::Entity as SellerProducts;
pub use sellers::Entity as Sellers;
pub use shipping_addresses::Entity as ShippingAddresses;
pub use users::Entity as Users;
