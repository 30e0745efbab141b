use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Order, ShippingAddress};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OrderWithAddress {
    pub order: Order,
    pub shipping_address: ShippingAddress,
}
