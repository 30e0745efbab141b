use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSellerRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSellerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}
