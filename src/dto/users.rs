use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Already hashed by the auth subsystem.
    pub password_hash: String,
}
