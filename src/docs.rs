use crate::api::users::UserResponse;
use utoipa::OpenApi;

/// Prefix the handler paths are documented under.
const DOCUMENTED_PREFIX: &str = "/api/v1";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presence Analyzer API",
        version = "1.0.0",
        description = r#"
## Presence Analyzer

Aggregates the daily attendance log (clock-in / clock-out per user and day)
into per-weekday statistics.

### Queries
- **Mean presence time** per weekday, in seconds
- **Total presence time** per weekday, in seconds
- **Mean start and end** clock time per weekday
- **Users** listing with avatars from the intranet directory

Every query returns exactly seven weekday rows, Monday first. Weekdays with no
records report zero. Unknown users yield `404`.

Attendance data is re-read from disk at most once per cache window.
"#,
    ),
    paths(
        crate::api::users::list_users,

        crate::api::presence::mean_time_weekday,
        crate::api::presence::presence_weekday,
        crate::api::presence::presence_start_end
    ),
    components(
        schemas(
            UserResponse
        )
    ),
    tags(
        (name = "Users", description = "User directory APIs"),
        (name = "Presence", description = "Per-weekday presence statistics"),
    )
)]
pub struct ApiDoc;

/// OpenAPI document with paths moved under the configured API prefix.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let api_prefix = api_prefix.trim_end_matches('/');
    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| {
            let path = match path.strip_prefix(DOCUMENTED_PREFIX) {
                Some(rest) => format!("{api_prefix}{rest}"),
                None => path,
            };
            (path, item)
        })
        .collect();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_query_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/users",
            "/api/v1/mean_time_weekday/{user_id}",
            "/api/v1/presence_weekday/{user_id}",
            "/api/v1/presence_start_end_per_weekday/{user_id}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{expected} missing");
        }
    }

    #[test]
    fn paths_follow_configured_prefix() {
        let doc = api_doc("/presence/");
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert_eq!(paths.len(), 4);
        assert!(paths.iter().any(|p| p.as_str() == "/presence/users"));
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/presence/mean_time_weekday/{user_id}")
        );
        assert!(paths.iter().all(|p| !p.starts_with("/api/v1")));
    }
}
