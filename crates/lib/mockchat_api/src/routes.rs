//! Route paths. Everything lives under [`API_PREFIX`].

/// Version prefix shared by every endpoint.
pub const API_PREFIX: &str = "/api/v1";

pub const GET_HEALTH: &str = "/api/v1/health";
pub const POST_SESSIONS_NEW: &str = "/api/v1/sessions/new";
pub const GET_SESSIONS: &str = "/api/v1/sessions";
pub const GET_SESSION_HISTORY: &str = "/api/v1/sessions/{session_id}/history";
pub const POST_SESSION_QUESTION: &str = "/api/v1/sessions/{session_id}/question";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_prefixed() {
        for route in [
            GET_HEALTH,
            POST_SESSIONS_NEW,
            GET_SESSIONS,
            GET_SESSION_HISTORY,
            POST_SESSION_QUESTION,
        ] {
            assert!(route.starts_with(API_PREFIX), "{route}");
        }
    }
}
