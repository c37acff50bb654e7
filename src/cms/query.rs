//! Query catalog: the fixed GraphQL documents and their variables.
//!
//! | Query                  | Variables                | Result sets                          |
//! |------------------------|--------------------------|--------------------------------------|
//! | `ArticleListComponent` | project, component       | `component_article_list`             |
//! | `ArticleList`          | [`ArticleListVariables`] | `Articles`, `Articles_aggregated`    |
//! | `ArticleComponent`     | project, component       | `component_single_article`           |
//! | `Article`              | project, slug            | `Articles`                           |
//! | `ArticleCategories`    | project, slug            | `Articles` (categories only)         |

use serde::{Serialize, Serializer, ser::SerializeMap};

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    /// Operation name, used in logs and errors.
    pub name: &'static str,
    pub document: &'static str,
}

pub const ARTICLE_LIST_COMPONENT: Query = Query {
    name: "ArticleListComponent",
    document: r#"
query ArticleListComponent($project: String, $component: String) {
    component_article_list(
        filter: {
            _and: [
                { project: { code: { _eq: $project } } }
                { name: { _eq: $component } }
                { status: { _eq: "published" } }
            ]
        }
    ) {
        columns
        rows
        spacing
        custom_code
        featured
        offset
        order_by
        order
        has_paging
        image_width
        aspect_ratio
        fit
        include_category_url_param
        include_category_url_path
        include_article_url_param
        include_categories {
            ArticleCategories_id {
                id
                slug
                title
            }
        }
        include_articles {
            Articles_id {
                id
                slug
                title
            }
        }
        project {
            primary_color
            secondary_color
        }
    }
}
"#,
};

pub const ARTICLE_LIST: Query = Query {
    name: "ArticleList",
    document: r#"
query ArticleList(
    $project: String
    $categories: [String]
    $articleIds: [GraphQLStringOrFloat]
    $sortField: [String] = ["-date_published"]
    $offset: Int = 0
    $limit: Int = 100
    $page: Int = 1
    $isFeatureFilterOperator: boolean_filter_operators = { _nnull: true }
) {
    Articles(
        page: $page
        filter: {
            _and: [
                { project: { code: { _eq: $project } } }
                { is_feature: $isFeatureFilterOperator }
                {
                    _or: [
                        { article_categories: { ArticleCategories_id: { slug: { _in: $categories } } } }
                        { id: { _in: $articleIds } }
                    ]
                }
            ]
        }
        sort: $sortField
        offset: $offset
        limit: $limit
    ) {
        id
        title
        slug
        date_published
        is_feature
        excerpt
        article_page
        featured_image {
            id
            title
        }
        article_categories {
            ArticleCategories_id {
                id
                title
                slug
            }
        }
    }
    Articles_aggregated(
        filter: {
            _and: [
                { project: { code: { _eq: $project } } }
                { is_feature: $isFeatureFilterOperator }
                {
                    _or: [
                        { article_categories: { ArticleCategories_id: { slug: { _in: $categories } } } }
                        { id: { _in: $articleIds } }
                    ]
                }
            ]
        }
    ) {
        count {
            id
        }
    }
}
"#,
};

pub const ARTICLE_COMPONENT: Query = Query {
    name: "ArticleComponent",
    document: r#"
query ArticleComponent($project: String, $component: String) {
    component_single_article(
        filter: {
            project: { code: { _eq: $project } }
            name: { _eq: $component }
            status: { _eq: "published" }
        }
    ) {
        article_slug
        custom_code
        image_width
        aspect_ratio
        fit
        project {
            primary_color
            secondary_color
        }
    }
}
"#,
};

pub const ARTICLE: Query = Query {
    name: "Article",
    document: r#"
query Article($project: String, $slug: String) {
    Articles(filter: { project: { code: { _eq: $project } }, slug: { _eq: $slug } }) {
        title
        body
        date_published
        is_feature
        article_image {
            id
            title
        }
        article_categories {
            ArticleCategories_id {
                id
                title
                slug
            }
        }
        gallery(sort: "sort") {
            directus_files_id {
                id
                title
            }
        }
        files(sort: "sort") {
            directus_files_id {
                id
                title
                description
                filename_download
            }
        }
    }
}
"#,
};

pub const ARTICLE_CATEGORIES: Query = Query {
    name: "ArticleCategories",
    document: r#"
query ArticleCategories($project: String, $slug: String) {
    Articles(filter: { project: { code: { _eq: $project } }, slug: { _eq: $slug } }) {
        article_categories {
            ArticleCategories_id {
                id
                title
                slug
            }
        }
    }
}
"#,
};

// ============================================================================
// Variables
// ============================================================================

/// Category value that no article carries.
pub const SENTINEL_CATEGORY: &str = "";
/// Article id that no article carries.
pub const SENTINEL_ARTICLE_ID: i64 = -1;

/// Variables of the component lookups.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentVariables<'a> {
    pub project: &'a str,
    pub component: &'a str,
}

/// Variables of the slug lookups (`Article`, `ArticleCategories`).
#[derive(Debug, Clone, Serialize)]
pub struct SlugVariables<'a> {
    pub project: &'a str,
    pub slug: &'a str,
}

/// Comparison applied to an article's `is_feature` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureFilter {
    /// `{ _nnull: true }`: featured and regular articles
    #[default]
    NotNull,
    /// `{ _eq: true }`
    IsTrue,
    /// `{ _eq: false }`
    IsFalse,
}

impl Serialize for FeatureFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::NotNull => map.serialize_entry("_nnull", &true)?,
            Self::IsTrue => map.serialize_entry("_eq", &true)?,
            Self::IsFalse => map.serialize_entry("_eq", &false)?,
        }
        map.end()
    }
}

/// Variables of [`ARTICLE_LIST`].
///
/// `Default` mirrors the defaults declared in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListVariables {
    pub project: String,
    pub categories: Vec<String>,
    pub article_ids: Vec<i64>,
    pub sort_field: Vec<String>,
    pub offset: u32,
    pub limit: u32,
    pub page: u32,
    pub is_feature_filter_operator: FeatureFilter,
}

impl Default for ArticleListVariables {
    fn default() -> Self {
        Self {
            project: String::new(),
            categories: Vec::new(),
            article_ids: Vec::new(),
            sort_field: vec!["-date_published".into()],
            offset: 0,
            limit: 100,
            page: 1,
            is_feature_filter_operator: FeatureFilter::NotNull,
        }
    }
}

impl ArticleListVariables {
    /// Replace empty inclusion lists by values nothing matches, so that an
    /// unconfigured list selects no article instead of every article.
    pub fn fail_closed(mut self) -> Self {
        if self.categories.is_empty() {
            self.categories.push(SENTINEL_CATEGORY.to_owned());
        }
        if self.article_ids.is_empty() {
            self.article_ids.push(SENTINEL_ARTICLE_ID);
        }
        self
    }
}
