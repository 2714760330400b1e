use serde::Serialize;

use crate::services::auth::Identity;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<Identity>,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub status: &'static str,
    pub username: Option<String>,
}
