use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::responses;
use crate::security;
use crate::store::DebtTable;
use crate::types::{CreateUserRequest, User};

/// Create a new user (signup). Does not require authentication; the
/// password is hashed before it ever reaches the table.
pub async fn create_user(table: &DebtTable, body: &[u8]) -> Result<Response<Body>, Error> {
    let req: CreateUserRequest = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!("Failed to parse signup body: {}", e);
            return responses::bad_request(&format!("Invalid request body: {e}"));
        }
    };

    if let Err(detail) = req.validate() {
        return responses::bad_request(&detail);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let user = User {
        username: req.username,
        email: req.email,
        full_name: req.full_name,
        password_hash: security::hash_password(&req.password),
        created_at: now.clone(),
        updated_at: now,
    };

    match table.put_user(&user).await {
        Ok(()) => responses::json(
            StatusCode::CREATED,
            &serde_json::json!({
                "message": format!("User {} created successfully", user.username),
                "user": user.profile(),
            }),
        ),
        Err(err) => responses::store_error(&err),
    }
}

/// Get a user profile. Callers can only read their own data; the response
/// never includes the password hash.
pub async fn get_user(
    table: &DebtTable,
    caller: &str,
    username: &str,
) -> Result<Response<Body>, Error> {
    if username != caller {
        return responses::forbidden("You can only access your own user data");
    }

    match table.get_user(username).await {
        Ok(Some(user)) => responses::json(StatusCode::OK, &user.profile()),
        Ok(None) => responses::not_found(&format!("User '{username}' not found")),
        Err(err) => responses::store_error(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::offline_table;

    #[tokio::test]
    async fn signup_rejects_unparseable_body() {
        let table = offline_table();
        let resp = create_user(&table, b"not json").await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_rejects_invalid_username() {
        let table = offline_table();
        let body = serde_json::json!({
            "username": "jo#hn",
            "email": "john@example.com",
            "full_name": "John Doe",
            "password": "long enough",
        });
        let resp = create_user(&table, body.to_string().as_bytes())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_reads_are_self_only() {
        let table = offline_table();
        let resp = get_user(&table, "john", "jane").await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
