//! Query parameter types for the public list endpoints.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `portico_core::search::page` before they reach
/// a query.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /projects?category=<slug>`
#[derive(Debug, Deserialize)]
pub struct ProjectListParams {
    pub category: Option<String>,
}

/// `GET /publications?type=<prefix>`
#[derive(Debug, Deserialize)]
pub struct PublicationListParams {
    #[serde(rename = "type")]
    pub publication_type: Option<String>,
}

/// `GET /gallery?category=<text>`
#[derive(Debug, Deserialize)]
pub struct GalleryListParams {
    pub category: Option<String>,
}

/// `GET /news?category=<slug>&featured=true&limit=&offset=`
#[derive(Debug, Deserialize)]
pub struct NewsListParams {
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /admin/project-leaders?search=<text>` and the team member list.
#[derive(Debug, Default, Deserialize)]
pub struct NameSearchParams {
    pub search: Option<String>,
}

/// Query parameters for admin lists that can include hidden rows.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
