use debt_shared::{auth, debts, responses, users, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use std::sync::Arc;

/// Main Lambda handler - routes requests to user and debt endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!("API request - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return responses::preflight();
    }

    let caller = auth::authenticated_username(&event);
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method, parts.as_slice()) {
        // Health check for load balancers and monitoring, no auth.
        (&Method::GET, ["healthz"]) => healthz(),

        // POST /users - signup, no auth
        (&Method::POST, ["users"]) => users::create_user(&state.table, body).await,
        // GET /users/{username} - own profile only
        (&Method::GET, ["users", username]) => match &caller {
            Some(user) => users::get_user(&state.table, user, username).await,
            None => responses::unauthorized(),
        },
        (_, ["users"]) | (_, ["users", _]) => responses::method_not_allowed(),

        // POST /debts - create debt for the authenticated user
        (&Method::POST, ["debts"]) => match &caller {
            Some(user) => debts::create_debt(&state.table, user, body).await,
            None => responses::unauthorized(),
        },
        // GET /debts - list the authenticated user's debts
        (&Method::GET, ["debts"]) => match &caller {
            Some(user) => debts::list_debts(&state.table, user).await,
            None => responses::unauthorized(),
        },
        // GET /debts/{id} - get debt
        (&Method::GET, ["debts", debt_id]) => match &caller {
            Some(user) => debts::get_debt(&state.table, user, debt_id).await,
            None => responses::unauthorized(),
        },
        // PUT /debts/{id} - update debt
        (&Method::PUT, ["debts", debt_id]) => match &caller {
            Some(user) => debts::update_debt(&state.table, user, debt_id, body).await,
            None => responses::unauthorized(),
        },
        // DELETE /debts/{id} - delete debt
        (&Method::DELETE, ["debts", debt_id]) => match &caller {
            Some(user) => debts::delete_debt(&state.table, user, debt_id).await,
            None => responses::unauthorized(),
        },
        (_, ["debts"]) | (_, ["debts", _]) => responses::method_not_allowed(),

        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            responses::not_found("Not found")
        }
    }
}

fn healthz() -> Result<Response<Body>, Error> {
    responses::json(
        StatusCode::OK,
        &serde_json::json!({
            "status": "healthy",
            "service": "debt-management-api",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_dynamodb::Client as DynamoClient;
    use debt_shared::DebtTable;
    use lambda_http::http::header::HeaderValue;

    fn test_state() -> Arc<AppState> {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .build();
        AppState::new(DebtTable::new(
            DynamoClient::from_conf(config),
            "DebtManagementTable",
        ))
    }

    fn request(method: Method, path: &str) -> Request {
        let mut req = Request::default();
        *req.method_mut() = method;
        *req.uri_mut() = path.parse().unwrap();
        req
    }

    #[tokio::test]
    async fn healthz_reports_healthy() {
        let response = function_handler(request(Method::GET, "/healthz"), test_state())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("\"status\":\"healthy\""));
        assert!(body.contains("debt-management-api"));
    }

    #[tokio::test]
    async fn preflight_gets_cors_headers() {
        let response = function_handler(request(Method::OPTIONS, "/debts"), test_state())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("Access-Control-Allow-Methods"));
    }

    #[tokio::test]
    async fn debt_routes_require_a_caller() {
        let response = function_handler(request(Method::GET, "/debts"), test_state())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cross_user_profile_read_is_forbidden() {
        let mut req = request(Method::GET, "/users/jane");
        req.headers_mut()
            .insert("X-Username", HeaderValue::from_static("john"));
        let response = function_handler(req, test_state()).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = function_handler(request(Method::GET, "/projects"), test_state())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_verb_on_debts_is_method_not_allowed() {
        let mut req = request(Method::PATCH, "/debts/d1");
        req.headers_mut()
            .insert("X-Username", HeaderValue::from_static("john"));
        let response = function_handler(req, test_state()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
