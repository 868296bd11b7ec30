//! Pagination planning
//!
//! Computes the limit/offset window and the fixed navigation link set
//! (self/first/prev/next/last) from the row count and the canonical
//! request URL. Links are a pure function of their inputs.

use serde::Serialize;

/// Items per page when the client sends nothing usable
pub const DEFAULT_LIMIT: usize = 10;

/// One navigation link in a list envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
}

/// A decoded list request: window, sort spec, and the base URL
/// (scheme + host + path, query string stripped) links are built from
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
    pub sort: Option<String>,
    pub base_url: String,
}

impl PageRequest {
    /// Decode raw query values. A missing or non-numeric `limit` falls
    /// back to the default, as does a non-positive one; `offset` falls
    /// back to zero.
    pub fn from_query(
        limit: Option<&str>,
        offset: Option<&str>,
        sort: Option<String>,
        base_url: String,
    ) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_LIMIT);

        let offset = offset
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .map(|n| n as usize)
            .unwrap_or(0);

        Self {
            limit,
            offset,
            sort,
            base_url,
        }
    }
}

/// Build the navigation links for one page window.
///
/// `prev` appears only when a full page fits before the offset; `next`
/// only when rows remain past the window. An empty table still gets
/// `first` and `last` at offset 0.
pub fn page_links(base_url: &str, limit: usize, offset: usize, total: usize) -> Vec<Link> {
    let limit = limit.max(1);

    let href = |offset: usize| format!("{}?limit={}&offset={}", base_url, limit, offset);

    let mut links = vec![
        Link {
            rel: "self",
            href: href(offset),
        },
        Link {
            rel: "first",
            href: href(0),
        },
    ];

    if offset >= limit {
        links.push(Link {
            rel: "prev",
            href: href(offset - limit),
        });
    }

    if offset + limit < total {
        links.push(Link {
            rel: "next",
            href: href(offset + limit),
        });
    }

    let pages = ((total + limit - 1) / limit).max(1);
    links.push(Link {
        rel: "last",
        href: href(limit * (pages - 1)),
    });

    links
}
