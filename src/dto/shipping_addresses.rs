use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShippingAddressRequest {
    pub name: String,
    pub address: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShippingAddressRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}
