//! AIS protocol versions.
//!
//! The v1 and v2 REST APIs differ in their endpoint roots, in how the
//! default config is requested, and most importantly in pagination: v1
//! servers can't paginate a browse at all, while v2 servers hand back a
//! follow link whenever more records exist. All of that divergence is
//! answered here, once, based on the version picked at startup.

use std::fmt::Display;

use crate::browse::Cursor;
use crate::consts;
use crate::error::{JdeError, JdeResult};
use crate::rest::models::{Link, Summary};

/// The AIS REST API version spoken by a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// `/jderest/...`, no pagination
    V1,
    /// `/jderest/v2/...`, follow-link pagination
    V2,
}

/// Paging parameters for a browse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Paging {
    /// Sent as `maxPageSize`
    pub(crate) max_page_size: String,
    /// Sent as `enableNextPageProcessing`
    pub(crate) next_page_processing: bool,
}

impl ProtocolVersion {
    fn api_root(self) -> &'static str {
        match self {
            ProtocolVersion::V1 => consts::API_ROOT,
            ProtocolVersion::V2 => consts::API_ROOT_V2,
        }
    }

    /// Full url for `endpoint` on the server at `ais_url`.
    pub(crate) fn endpoint(self, ais_url: &str, endpoint: &str) -> String {
        format!("{ais_url}{}/{endpoint}", self.api_root())
    }

    /// Query parameters for the default config request.
    pub(crate) fn config_query(self) -> Vec<(&'static str, &'static str)> {
        match self {
            ProtocolVersion::V1 => vec![("requiredCapabilities", consts::REQUIRED_CAPABILITIES)],
            ProtocolVersion::V2 => vec![
                ("all", "true"),
                ("requiredCapabilities", consts::REQUIRED_CAPABILITIES),
            ],
        }
    }

    /// Paging for a first-page browse. v1 servers ignore the hint entirely
    /// and always get the "no maximum" sentinel.
    pub(crate) fn paging(self, page_size_hint: u32, paginate: bool) -> Paging {
        match self {
            ProtocolVersion::V1 => Paging {
                max_page_size: consts::NO_MAX_PAGE_SIZE.to_owned(),
                next_page_processing: false,
            },
            ProtocolVersion::V2 => Paging {
                max_page_size: page_size_hint.to_string(),
                next_page_processing: paginate,
            },
        }
    }

    /// Work out where the next page lives, if anywhere.
    ///
    /// v1 never paginates, so links are not even looked at. On v2, a server
    /// claiming more records without a link is broken, and we say so rather
    /// than silently truncating the listing.
    pub(crate) fn next_cursor(
        self,
        paginate: bool,
        summary: &Summary,
        links: &[Link],
    ) -> JdeResult<Option<Cursor>> {
        match self {
            ProtocolVersion::V1 => Ok(None),
            ProtocolVersion::V2 if !paginate || !summary.more_records => Ok(None),
            ProtocolVersion::V2 => links
                .first()
                .map(|link| Some(Cursor::new(link.href.to_owned())))
                .ok_or_else(|| {
                    JdeError::ProtocolViolation(
                        "server reported more records but sent no continuation link".to_owned(),
                    )
                }),
        }
    }

    /// Whether the server can follow a continuation link at all.
    pub(crate) fn supports_pagination(self) -> bool {
        matches!(self, ProtocolVersion::V2)
    }

    /// Whether the dedicated token validation endpoint exists.
    pub(crate) fn supports_token_validation(self) -> bool {
        matches!(self, ProtocolVersion::V2)
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(more_records: bool) -> Summary {
        Summary {
            records: 2,
            more_records,
        }
    }

    fn link(href: &str) -> Link {
        Link {
            rel: "next".to_owned(),
            href: href.to_owned(),
        }
    }

    #[test]
    fn endpoints_follow_version_root() {
        assert_eq!(
            ProtocolVersion::V1.endpoint("https://ais:9300", "tokenrequest"),
            "https://ais:9300/jderest/tokenrequest"
        );
        assert_eq!(
            ProtocolVersion::V2.endpoint("https://ais:9300", "tokenrequest"),
            "https://ais:9300/jderest/v2/tokenrequest"
        );
    }

    #[test]
    fn v1_config_query_has_no_all_param() {
        assert!(!ProtocolVersion::V1
            .config_query()
            .iter()
            .any(|(k, _)| *k == "all"));
        assert!(ProtocolVersion::V2.config_query().contains(&("all", "true")));
    }

    #[test]
    fn v1_ignores_page_size_hints() {
        for hint in [1, 2, 100, 5000] {
            let paging = ProtocolVersion::V1.paging(hint, true);
            assert_eq!(paging.max_page_size, "No Max");
            assert!(!paging.next_page_processing);
        }
    }

    #[test]
    fn v2_sends_hint_verbatim() {
        let paging = ProtocolVersion::V2.paging(2, true);
        assert_eq!(paging.max_page_size, "2");
        assert!(paging.next_page_processing);
    }

    #[test]
    fn v1_never_yields_a_cursor() {
        let cursor = ProtocolVersion::V1
            .next_cursor(true, &summary(true), &[link("https://ais/next")])
            .unwrap();
        assert!(cursor.is_none());
        // Even a missing link isn't a violation on v1.
        assert!(ProtocolVersion::V1
            .next_cursor(true, &summary(true), &[])
            .unwrap()
            .is_none());
    }

    #[test]
    fn v2_cursor_is_first_link() {
        let cursor = ProtocolVersion::V2
            .next_cursor(
                true,
                &summary(true),
                &[link("https://ais/next?page=2"), link("https://ais/other")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(cursor.as_str(), "https://ais/next?page=2");
    }

    #[test]
    fn v2_without_more_records_ends() {
        assert!(ProtocolVersion::V2
            .next_cursor(true, &summary(false), &[link("https://ais/next")])
            .unwrap()
            .is_none());
    }

    #[test]
    fn v2_more_records_without_links_is_violation() {
        let res = ProtocolVersion::V2.next_cursor(true, &summary(true), &[]);
        assert!(matches!(res, Err(JdeError::ProtocolViolation(_))));
    }

    #[test]
    fn v2_with_pagination_disabled_ends() {
        assert!(ProtocolVersion::V2
            .next_cursor(false, &summary(true), &[])
            .unwrap()
            .is_none());
    }
}
