//! Entities decoded from CMS result sets.
//!
//! Everything here is read-only once deserialized. The CMS sends `null` for
//! unset fields; those decode to the field's default instead of failing.

use super::query::FeatureFilter;
use serde::{Deserialize, Deserializer};

// ============================================================================
// Lenient decoding helpers
// ============================================================================

/// `null` → `T::default()`
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric fields arrive as numbers or, for ids and decimals, as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(n) if n.fract() == 0.0 => Some(*n as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Numeric::deserialize(deserializer)?;
    value
        .as_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer or a numeric string"))
}

fn optional_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected an integer or a numeric string")),
    }
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("expected a number or a numeric string")),
    }
}

// ============================================================================
// Shared pieces
// ============================================================================

/// Colors of the project a component belongs to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectTheme {
    #[serde(default, deserialize_with = "nullable")]
    pub primary_color: String,
    #[serde(default, deserialize_with = "nullable")]
    pub secondary_color: String,
}

/// Reference to an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileRef {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

/// Downloadable attachment of an article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DownloadFile {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub filename_download: String,
}

/// Junction row `{ directus_files_id: {...} }`. The file is `null` when it
/// was deleted but the junction row survived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileLink<T> {
    pub directus_files_id: Option<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "optional_integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

/// Junction row `{ ArticleCategories_id: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryLink {
    #[serde(rename = "ArticleCategories_id", default)]
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleRef {
    #[serde(deserialize_with = "integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

/// Junction row `{ Articles_id: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleLink {
    #[serde(rename = "Articles_id", default)]
    pub article: Option<ArticleRef>,
}

/// Slugs of the categories behind a list of junction rows, skipping
/// dangling rows and empty slugs.
pub fn category_slugs(links: &[CategoryLink]) -> impl Iterator<Item = &str> {
    links
        .iter()
        .filter_map(|link| link.category.as_ref())
        .map(|category| category.slug.as_str())
        .filter(|slug| !slug.is_empty())
}

/// Thumbnail geometry shared by both component kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSizing {
    pub width: u32,
    pub aspect_ratio: f64,
    pub fit: String,
}

impl ImageSizing {
    /// `round(width × aspect_ratio)`, never negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn height(&self) -> u32 {
        let height = (f64::from(self.width) * self.aspect_ratio).round();
        height.clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

// ============================================================================
// Components
// ============================================================================

/// Which articles a list shows with respect to their `is_feature` flag.
///
/// Any value other than `all` or `show` means `hide`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedMode {
    All,
    Show,
    #[default]
    #[serde(other)]
    Hide,
}

impl FeaturedMode {
    pub const fn operator(self) -> FeatureFilter {
        match self {
            Self::All => FeatureFilter::NotNull,
            Self::Show => FeatureFilter::IsTrue,
            Self::Hide => FeatureFilter::IsFalse,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Desc,
    #[default]
    #[serde(other)]
    Asc,
}

/// `component_article_list` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListComponent {
    #[serde(default, deserialize_with = "nullable")]
    pub columns: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub rows: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub spacing: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_code: String,
    #[serde(default, deserialize_with = "nullable")]
    pub featured: FeaturedMode,
    #[serde(default, deserialize_with = "nullable")]
    pub offset: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub order_by: String,
    #[serde(default, deserialize_with = "nullable")]
    pub order: SortOrder,
    #[serde(default, deserialize_with = "nullable")]
    pub has_paging: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub image_width: u32,
    #[serde(default, deserialize_with = "decimal")]
    pub aspect_ratio: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub fit: String,
    #[serde(default, deserialize_with = "nullable")]
    pub include_category_url_param: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub include_category_url_path: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub include_article_url_param: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub include_categories: Vec<CategoryLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub include_articles: Vec<ArticleLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub project: ProjectTheme,
}

impl ListComponent {
    /// Articles per page: `columns × rows`.
    pub fn page_size(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    /// `sortField` entry, `-` prefixed when descending. `None` leaves the
    /// document default in place.
    pub fn sort_field(&self) -> Option<String> {
        let field = self.order_by.trim();
        if field.is_empty() {
            return None;
        }
        Some(match self.order {
            SortOrder::Desc => format!("-{field}"),
            SortOrder::Asc => field.to_owned(),
        })
    }

    /// Ids of the statically included articles.
    pub fn article_ids(&self) -> Vec<i64> {
        self.include_articles
            .iter()
            .filter_map(|link| link.article.as_ref())
            .map(|article| article.id)
            .collect()
    }

    pub fn sizing(&self) -> ImageSizing {
        ImageSizing {
            width: self.image_width,
            aspect_ratio: self.aspect_ratio,
            fit: self.fit.clone(),
        }
    }
}

/// `article_slug` value that means "take the slug from the `article` URL param".
pub const SLUG_FROM_URL: &str = "url";

/// `component_single_article` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleComponent {
    #[serde(default, deserialize_with = "nullable")]
    pub article_slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_code: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image_width: u32,
    #[serde(default, deserialize_with = "decimal")]
    pub aspect_ratio: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub fit: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project: ProjectTheme,
}

impl ArticleComponent {
    pub fn sizing(&self) -> ImageSizing {
        ImageSizing {
            width: self.image_width,
            aspect_ratio: self.aspect_ratio,
            fit: self.fit.clone(),
        }
    }
}

// ============================================================================
// Articles
// ============================================================================

/// One entry of the `ArticleList` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSummary {
    #[serde(default, deserialize_with = "optional_integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub date_published: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_feature: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "nullable")]
    pub article_page: String,
    #[serde(default)]
    pub featured_image: Option<FileRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub article_categories: Vec<CategoryLink>,
}

/// `Article` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
    #[serde(default, deserialize_with = "nullable")]
    pub date_published: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_feature: bool,
    #[serde(default)]
    pub article_image: Option<FileRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub article_categories: Vec<CategoryLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub gallery: Vec<FileLink<FileRef>>,
    #[serde(default, deserialize_with = "nullable")]
    pub files: Vec<FileLink<DownloadFile>>,
}

impl ArticleDetail {
    /// Gallery images in CMS sort order, dangling rows skipped.
    pub fn gallery_images(&self) -> Vec<&FileRef> {
        self.gallery
            .iter()
            .filter_map(|link| link.directus_files_id.as_ref())
            .collect()
    }

    /// Attachments in CMS sort order, dangling rows skipped.
    pub fn downloads(&self) -> Vec<&DownloadFile> {
        self.files
            .iter()
            .filter_map(|link| link.directus_files_id.as_ref())
            .collect()
    }
}

/// `ArticleCategories` result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleCategories {
    #[serde(default, deserialize_with = "nullable")]
    pub article_categories: Vec<CategoryLink>,
}

/// `Articles_aggregated` entry: `{ count: { id: N } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleAggregate {
    #[serde(default)]
    pub count: AggregateCount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateCount {
    #[serde(default, deserialize_with = "optional_integer")]
    pub id: Option<i64>,
}

impl ArticleAggregate {
    /// Number of matching articles; negative or missing counts read as 0.
    pub fn total(&self) -> u64 {
        self.count
            .id
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list_component(value: serde_json::Value) -> ListComponent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_list_component_nulls_default() {
        let component = list_component(json!({
            "columns": 3,
            "rows": 2,
            "spacing": null,
            "custom_code": null,
            "featured": null,
            "order_by": null,
            "include_categories": null,
            "include_articles": null,
            "project": null
        }));
        assert_eq!(component.page_size(), 6);
        assert_eq!(component.spacing, 0);
        assert!(component.custom_code.is_empty());
        assert_eq!(component.featured, FeaturedMode::Hide);
        assert!(component.sort_field().is_none());
        assert!(component.include_categories.is_empty());
        assert!(component.project.primary_color.is_empty());
    }

    #[test]
    fn test_featured_mode_operators() {
        let mode = |s: &str| serde_json::from_value::<FeaturedMode>(json!(s)).unwrap();
        assert_eq!(mode("all").operator(), FeatureFilter::NotNull);
        assert_eq!(mode("show").operator(), FeatureFilter::IsTrue);
        assert_eq!(mode("hide").operator(), FeatureFilter::IsFalse);
        assert_eq!(mode("sometimes"), FeaturedMode::Hide);
    }

    #[test]
    fn test_sort_field() {
        let component = list_component(json!({ "order_by": "date_published", "order": "desc" }));
        assert_eq!(component.sort_field().as_deref(), Some("-date_published"));

        let component = list_component(json!({ "order_by": "title", "order": "asc" }));
        assert_eq!(component.sort_field().as_deref(), Some("title"));

        let component = list_component(json!({ "order_by": "title", "order": null }));
        assert_eq!(component.sort_field().as_deref(), Some("title"));
    }

    #[test]
    fn test_sort_order_unknown_is_ascending() {
        let order = |value: &str| serde_json::from_value::<SortOrder>(json!(value)).unwrap();
        assert_eq!(order("desc"), SortOrder::Desc);
        assert_eq!(order("asc"), SortOrder::Asc);
        assert_eq!(order("random"), SortOrder::Asc);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn test_article_ids_accept_numeric_strings() {
        let component = list_component(json!({
            "include_articles": [
                { "Articles_id": { "id": "12", "slug": "a", "title": "A" } },
                { "Articles_id": { "id": 7, "slug": "b", "title": "B" } },
                { "Articles_id": null }
            ]
        }));
        assert_eq!(component.article_ids(), vec![12, 7]);
    }

    #[test]
    fn test_article_id_rejects_text() {
        let result = serde_json::from_value::<ArticleRef>(json!({ "id": "twelve" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_decimal_aspect_ratio_as_string() {
        let component = list_component(json!({ "image_width": 400, "aspect_ratio": "0.75" }));
        let sizing = component.sizing();
        assert_eq!(sizing.width, 400);
        assert_eq!(sizing.height(), 300);
    }

    #[test]
    fn test_image_height_rounds() {
        let sizing = ImageSizing {
            width: 333,
            aspect_ratio: 0.5,
            fit: "cover".into(),
        };
        // 166.5 rounds away from zero
        assert_eq!(sizing.height(), 167);
    }

    #[test]
    fn test_category_slugs_skip_dangling() {
        let categories: ArticleCategories = serde_json::from_value(json!({
            "article_categories": [
                { "ArticleCategories_id": { "id": 1, "slug": "sports", "title": "Sports" } },
                { "ArticleCategories_id": null },
                { "ArticleCategories_id": { "id": 2, "slug": null, "title": "Untitled" } }
            ]
        }))
        .unwrap();
        let slugs: Vec<_> = category_slugs(&categories.article_categories).collect();
        assert_eq!(slugs, vec!["sports"]);
    }

    #[test]
    fn test_article_detail_gallery_and_files() {
        let article: ArticleDetail = serde_json::from_value(json!({
            "title": "Hello",
            "body": "<p>hi</p>",
            "article_image": { "id": "img", "title": "Cover" },
            "gallery": [
                { "directus_files_id": { "id": "g1", "title": "One" } },
                { "directus_files_id": null }
            ],
            "files": [
                { "directus_files_id": { "id": "f1", "title": "Menu", "description": null, "filename_download": "menu.pdf" } }
            ]
        }))
        .unwrap();
        assert_eq!(article.gallery_images().len(), 1);
        assert_eq!(article.downloads()[0].filename_download, "menu.pdf");
        assert!(article.downloads()[0].description.is_empty());
    }

    #[test]
    fn test_aggregate_count_number_or_string() {
        let aggregate: ArticleAggregate =
            serde_json::from_value(json!({ "count": { "id": 25 } })).unwrap();
        assert_eq!(aggregate.total(), 25);

        let aggregate: ArticleAggregate =
            serde_json::from_value(json!({ "count": { "id": "25" } })).unwrap();
        assert_eq!(aggregate.total(), 25);

        let aggregate: ArticleAggregate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(aggregate.total(), 0);
    }
}
