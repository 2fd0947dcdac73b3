use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method, Status};
use rocket::{Request, Response};
use std::io::Cursor;

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Cross-origin policy: a single trusted origin, the standard methods, any
/// header, credentials allowed.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new<S: Into<String>>(allowed_origin: S) -> Cors {
        Cors { allowed_origin: allowed_origin.into() }
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        origin == self.allowed_origin
    }

    /// Headers attached to an actual (non-preflight) response for `origin`.
    pub fn response_headers(&self, origin: &str) -> Vec<Header<'static>> {
        if !self.allows_origin(origin) {
            return Vec::new();
        }
        vec![
            Header::new("Access-Control-Allow-Origin", origin.to_string()),
            Header::new("Access-Control-Allow-Credentials", "true"),
        ]
    }

    pub fn allows_method(&self, method: &str) -> bool {
        ALLOWED_METHODS.split(", ").any(|allowed| allowed == method)
    }

    /// Headers answering a preflight from `origin`, or the rejection message
    /// naming what was disallowed.
    ///
    /// Requested headers are echoed back: a literal `*` is not honoured by
    /// browsers once credentials are allowed.
    pub fn preflight_headers(&self, origin: &str, requested_method: &str,
                             requested_headers: Option<&str>)
        -> Result<Vec<Header<'static>>, String> {

        let mut disallowed = Vec::new();
        if !self.allows_origin(origin) {
            disallowed.push("origin");
        }
        if !self.allows_method(requested_method) {
            disallowed.push("method");
        }
        if !disallowed.is_empty() {
            return Err(format!("Disallowed CORS {}", disallowed.join(", ")));
        }

        let mut headers = self.response_headers(origin);
        headers.push(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
        headers.push(Header::new("Access-Control-Max-Age", PREFLIGHT_MAX_AGE));
        if let Some(requested) = requested_headers {
            headers.push(Header::new("Access-Control-Allow-Headers", requested.to_string()));
        }
        Ok(headers)
    }
}

fn is_preflight(request: &Request<'_>) -> bool {
    request.method() == Method::Options
        && request.headers().contains("Access-Control-Request-Method")
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let origin = match request.headers().get_one("Origin") {
            Some(origin) => origin,
            None => return,
        };
        response.adjoin_raw_header("Vary", "Origin");

        if !is_preflight(request) {
            for header in self.response_headers(origin) {
                response.set_header(header);
            }
            return;
        }

        // No route answers OPTIONS; replace whatever the router produced.
        response.remove_header("Content-Type");
        let method = request.headers().get_one("Access-Control-Request-Method").unwrap_or_default();
        let requested = request.headers().get_one("Access-Control-Request-Headers");
        match self.preflight_headers(origin, method, requested) {
            Ok(headers) => {
                response.set_status(Status::Ok);
                response.set_sized_body(0, Cursor::new(""));
                for header in headers {
                    response.set_header(header);
                }
            }
            Err(message) => {
                tracing::debug!("rejected preflight from {}: {}", origin, message);
                response.set_status(Status::BadRequest);
                response.set_header(rocket::http::ContentType::Plain);
                response.set_sized_body(message.len(), Cursor::new(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_value<'a>(headers: &'a [Header<'static>], name: &str) -> Option<&'a str> {
        headers.iter().find(|h| h.name() == name).map(|h| h.value())
    }

    #[test]
    fn only_the_configured_origin_is_allowed() {
        let cors = Cors::new("http://localhost:5173");
        assert!(cors.allows_origin("http://localhost:5173"));
        assert!(!cors.allows_origin("http://localhost:5174"));
        assert!(!cors.allows_origin("http://evil.example"));
        assert!(cors.response_headers("http://evil.example").is_empty());
    }

    #[test]
    fn actual_response_echoes_origin_with_credentials() {
        let cors = Cors::new("http://localhost:5173");
        let headers = cors.response_headers("http://localhost:5173");
        assert_eq!(header_value(&headers, "Access-Control-Allow-Origin"), Some("http://localhost:5173"));
        assert_eq!(header_value(&headers, "Access-Control-Allow-Credentials"), Some("true"));
    }

    #[test]
    fn preflight_allows_any_method_and_echoes_requested_headers() {
        let cors = Cors::new("http://localhost:5173");
        let headers = cors
            .preflight_headers("http://localhost:5173", "PATCH", Some("content-type, x-trace"))
            .unwrap();
        assert_eq!(header_value(&headers, "Access-Control-Allow-Methods"), Some(ALLOWED_METHODS));
        assert_eq!(header_value(&headers, "Access-Control-Allow-Headers"), Some("content-type, x-trace"));
        assert_eq!(header_value(&headers, "Access-Control-Max-Age"), Some("600"));

        assert_eq!(
            cors.preflight_headers("http://other.example", "POST", None).unwrap_err(),
            "Disallowed CORS origin"
        );
    }

    #[test]
    fn preflight_rejects_methods_outside_the_allowed_list() {
        let cors = Cors::new("http://localhost:5173");
        assert!(cors.allows_method("DELETE"));
        assert!(!cors.allows_method("TRACE"));
        assert!(!cors.allows_method("post"));

        assert_eq!(
            cors.preflight_headers("http://localhost:5173", "TRACE", None).unwrap_err(),
            "Disallowed CORS method"
        );
        assert_eq!(
            cors.preflight_headers("http://other.example", "CONNECT", None).unwrap_err(),
            "Disallowed CORS origin, method"
        );
    }
}
