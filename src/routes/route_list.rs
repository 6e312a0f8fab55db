use serde::Serialize;

/// One `.route(..)` registration found under `src/routes/api` at build time.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub source: &'static str,
    pub handler: &'static str,
    /// The handler takes an `AuthSession`.
    pub auth_required: bool,
}

include!(concat!(env!("OUT_DIR"), "/routes_generated.rs"));

pub fn routes() -> &'static [RouteInfo] {
    ROUTES
}

#[cfg(test)]
mod tests {
    use super::routes;

    #[test]
    fn catalogue_lists_prefixed_routes() {
        let all = routes();
        assert!(all.iter().all(|route| route.path.starts_with("/api/")));
        assert!(
            all.iter()
                .any(|route| route.method == "POST" && route.path == "/api/auth/sign-up/email")
        );
    }

    #[test]
    fn guarded_handlers_are_flagged() {
        let find = |method: &str, path: &str| {
            routes()
                .iter()
                .find(|route| route.method == method && route.path == path)
                .copied()
        };
        assert_eq!(find("GET", "/api/schedule").map(|r| r.auth_required), Some(true));
        assert_eq!(find("GET", "/api/health").map(|r| r.auth_required), Some(false));
    }
}
