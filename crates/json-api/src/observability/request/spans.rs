//! HTTP span helpers.

use groupbuy_app::domain::group_buys::links::UniqueLink;
use uuid::Uuid;

/// Route template used for span names and metric labels.
///
/// Ids and shareable links are replaced by placeholders so label
/// cardinality stays bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestRoute {
    pub(super) route: String,
    pub(super) span_name: String,
}

pub(super) fn request_route(method: &str, path: &str) -> RequestRoute {
    let route = normalise_path(path);
    let span_name = format!("{method} {route}");

    RequestRoute { route, span_name }
}

fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else if UniqueLink::parse(segment).is_ok() {
                "{link}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_and_ids_are_replaced() {
        let route = request_route(
            "POST",
            "/groupbuy/apply-discount/0192f1c4-7e5a-7c3b-9a1d-2b3c4d5e6f70",
        );

        assert_eq!(route.route, "/groupbuy/apply-discount/{uuid}");
        assert_eq!(route.span_name, "POST /groupbuy/apply-discount/{uuid}");

        let route = request_route("GET", "/groupbuy/AAAAAAAAAAAAAAAAAAAAAA");

        assert_eq!(route.route, "/groupbuy/{link}");
    }

    #[test]
    fn static_paths_are_kept() {
        assert_eq!(request_route("GET", "/").route, "/");
        assert_eq!(request_route("GET", "/healthcheck").route, "/healthcheck");
    }
}
