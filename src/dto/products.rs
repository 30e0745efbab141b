use serde::Deserialize;
use uuid::Uuid;

use crate::price::Price;

pub const DEFAULT_AUTHOR: &str = "admin";
pub const IMAGE_UPLOAD_DIR: &str = "images/";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    /// File name or path inside the asset store; stored under `images/`.
    pub image: String,
    pub price: Price,
    pub in_stock: Option<bool>,
    pub is_active: Option<bool>,
}

impl CreateProductRequest {
    pub fn new(
        category_id: Uuid,
        created_by: Uuid,
        title: impl Into<String>,
        image: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            category_id,
            created_by,
            title: title.into(),
            author: None,
            description: None,
            image: image.into(),
            price,
            in_stock: None,
            is_active: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Price>,
    pub in_stock: Option<bool>,
    pub is_active: Option<bool>,
}

/// Prefix a bare file name with the upload directory.
pub fn image_path(image: &str) -> String {
    let image = image.trim_start_matches('/');
    if image.starts_with(IMAGE_UPLOAD_DIR) {
        image.to_string()
    } else {
        format!("{IMAGE_UPLOAD_DIR}{image}")
    }
}
