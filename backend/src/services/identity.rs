use actix_web::HttpRequest;

/// Header set by the identity-aware proxy in front of the server.
pub const IDENTITY_HEADER: &str = "X-Forwarded-Email";

const ANONYMOUS: &str = "anonymous";

/// The user on whose behalf the request is made.
pub fn current_user(req: &HttpRequest) -> String {
    req.headers()
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn reads_forwarded_email() {
        let req = TestRequest::default()
            .insert_header((IDENTITY_HEADER, " jae@example.com "))
            .to_http_request();
        assert_eq!(current_user(&req), "jae@example.com");
    }

    #[test]
    fn missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(current_user(&req), "anonymous");
    }
}
