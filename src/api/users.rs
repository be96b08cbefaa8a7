use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::utils::user_directory::UserDirectoryCache;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 10)]
    pub user_id: u64,
    #[schema(example = "Jan K.")]
    pub name: String,
    #[schema(example = "https://intranet.example.com:443/api/images/users/10")]
    pub avatar_url: String,
}

/// Users listing for the dropdown
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Known users ordered by id", body = Vec<UserResponse>),
        (status = 503, description = "Users directory unavailable", body = Object, example = json!({
            "message": "Source runtime/data/users.xml unavailable: No such file or directory (os error 2)"
        }))
    ),
    tag = "Users"
)]
#[instrument(name = "list_users", skip(users))]
pub async fn list_users(users: web::Data<UserDirectoryCache>) -> actix_web::Result<impl Responder> {
    let directory = users.get().await.inspect_err(|e| {
        error!(error = %e, "Failed to load users directory");
    })?;

    let body: Vec<UserResponse> = directory
        .iter()
        .map(|(user_id, entry)| UserResponse {
            user_id,
            name: entry.name.clone(),
            avatar_url: entry.avatar_url.clone(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}
