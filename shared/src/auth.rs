//! Caller identity extraction.
//!
//! Token validation happens at the API Gateway authorizer; by the time a
//! request reaches the handler the JWT claims are ground truth. Ownership
//! checks therefore key off the authenticated username, never off a
//! client-controlled path parameter.

use lambda_http::{Request, RequestExt};

/// Username of the authenticated caller, if any.
///
/// Claims come from the gateway's JWT authorizer (`username`, falling back
/// to `sub`). In local development the `X-Username` header overrides them.
pub fn authenticated_username(event: &Request) -> Option<String> {
    event
        .headers()
        .get("X-Username")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| {
            event
                .request_context()
                .authorizer()
                .and_then(|auth| auth.jwt.as_ref())
                .and_then(|jwt| {
                    jwt.claims
                        .get("username")
                        .or_else(|| jwt.claims.get("sub"))
                })
                .map(|s| s.to_string())
        })
        .filter(|username| !username.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::header::HeaderValue;

    #[test]
    fn header_override_supplies_the_caller() {
        let mut request = Request::default();
        request
            .headers_mut()
            .insert("X-Username", HeaderValue::from_static("john"));
        assert_eq!(authenticated_username(&request), Some("john".to_string()));
    }

    #[test]
    fn anonymous_requests_have_no_caller() {
        assert_eq!(authenticated_username(&Request::default()), None);
    }

    #[test]
    fn empty_header_is_not_an_identity() {
        let mut request = Request::default();
        request
            .headers_mut()
            .insert("X-Username", HeaderValue::from_static(""));
        assert_eq!(authenticated_username(&request), None);
    }
}
