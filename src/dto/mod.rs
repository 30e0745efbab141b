pub mod categories;
pub mod orders;
pub mod products;
pub mod sellers;
pub mod shipping_addresses;
pub mod users;
