//! Article list widget.

use super::layout::{Pagination, item_gap, total_pages};
use super::location::PageLocation;
use super::{EmptyReason, Fragment, Rendered, Renderer, variables};
use crate::cms::CmsError;
use crate::cms::query::{
    ARTICLE_CATEGORIES, ARTICLE_LIST, ARTICLE_LIST_COMPONENT, ArticleListVariables,
    ComponentVariables, SlugVariables,
};
use crate::cms::types::{
    ArticleAggregate, ArticleCategories, ArticleSummary, ListComponent, category_slugs,
};
use crate::log;
use crate::markup::{Element, Node, dom_id};
use crate::utils::date::format_date;

const PREVIOUS_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20" fill="currentColor" aria-hidden="true"><path fill-rule="evenodd" d="M12.79 5.23a.75.75 0 01-.02 1.06L8.832 10l3.938 3.71a.75.75 0 11-1.04 1.08l-4.5-4.25a.75.75 0 010-1.08l4.5-4.25a.75.75 0 011.06.02z" clip-rule="evenodd" /></svg>"#;
const NEXT_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20" fill="currentColor" aria-hidden="true"><path fill-rule="evenodd" d="M7.21 14.77a.75.75 0 01.02-1.06L11.168 10 7.23 6.29a.75.75 0 111.04-1.08l4.5 4.25a.75.75 0 010 1.08l-4.5 4.25a.75.75 0 01-1.06-.02z" clip-rule="evenodd" /></svg>"#;

impl Renderer<'_> {
    /// Render the `article-list` component `name` for `location`.
    pub async fn load_article_list(
        &self,
        name: &str,
        location: &PageLocation,
    ) -> Result<Rendered, CmsError> {
        let component_vars = ComponentVariables {
            project: self.api.project(),
            component: name,
        };
        let component: Option<ListComponent> = self
            .client
            .get_data(&ARTICLE_LIST_COMPONENT, variables(&component_vars)?)
            .await?
            .first_record(0)?;
        let Some(component) = component else {
            log!("error"; "component \"{}\" is not configured", name);
            return Ok(Rendered::Empty(EmptyReason::ConfigurationMissing));
        };

        let page_size = component.page_size();
        if page_size == 0 {
            log!(
                "error";
                "component \"{}\" has an invalid layout ({} columns × {} rows)",
                name, component.columns, component.rows
            );
            return Ok(Rendered::Empty(EmptyReason::InvalidLayout));
        }

        let categories = self.resolve_categories(&component, location).await?;
        let current_page = if component.has_paging {
            location.current_page()
        } else {
            1
        };
        let vars = list_variables(&component, self.api.project(), categories, current_page);

        let result = self
            .client
            .get_data(&ARTICLE_LIST, variables(&vars)?)
            .await?;
        let articles: Vec<ArticleSummary> = result.records(0)?;
        if articles.is_empty() {
            log!("warn"; "component \"{}\" does not have any articles", name);
            return Ok(Rendered::Empty(EmptyReason::DataEmpty));
        }

        let pagination = if component.has_paging {
            let count = result
                .first_record::<ArticleAggregate>(1)?
                .map_or(0, |aggregate| aggregate.total());
            Pagination::build(location, current_page, total_pages(count, page_size))
        } else {
            Pagination::default()
        };

        Ok(Rendered::Fragment(Fragment {
            nodes: self.list_markup(name, &component, &articles, &pagination, location),
            hooks: Vec::new(),
        }))
    }

    /// Category slugs the list is filtered by: URL parameter, categories of
    /// the `article` parameter's article, path segment, then static ones.
    /// Duplicates are dropped, first occurrence wins.
    async fn resolve_categories(
        &self,
        component: &ListComponent,
        location: &PageLocation,
    ) -> Result<Vec<String>, CmsError> {
        let mut categories = Vec::new();

        if component.include_category_url_param {
            categories.extend(location.category_param());
        }

        if component.include_article_url_param
            && let Some(slug) = location.article_param()
        {
            let slug_vars = SlugVariables {
                project: self.api.project(),
                slug: &slug,
            };
            let article: Option<ArticleCategories> = self
                .client
                .get_data(&ARTICLE_CATEGORIES, variables(&slug_vars)?)
                .await?
                .first_record(0)?;
            if let Some(article) = article {
                categories.extend(category_slugs(&article.article_categories).map(str::to_owned));
            }
        }

        if component.include_category_url_path
            && let Some(segment) = location.last_path_segment()
        {
            categories.push(segment);
        }

        categories.extend(category_slugs(&component.include_categories).map(str::to_owned));

        let mut unique: Vec<String> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Ok(unique)
    }

    fn list_markup(
        &self,
        name: &str,
        component: &ListComponent,
        articles: &[ArticleSummary],
        pagination: &Pagination,
        location: &PageLocation,
    ) -> Vec<Node> {
        let id = dom_id(name);
        let gap = item_gap(component.spacing, component.columns);
        let style = format!(
            "#{id}.cms-cy-posts__wrapper{{gap:{}px;}}#{id}.cms-cy-posts__wrapper > *{{width:calc(100% / {} - {gap}px);}}",
            component.spacing, component.columns
        );

        let mut nodes = vec![Element::new("style").raw(style).into()];
        if !component.custom_code.is_empty() {
            nodes.push(Node::raw(component.custom_code.clone()));
        }

        let origin = location.origin();
        let mut wrapper = Element::new("div")
            .id(id)
            .class("cms-cy-posts__wrapper")
            .children(
                articles
                    .iter()
                    .map(|article| self.list_item(component, article, &origin)),
            );
        if component.has_paging && pagination.is_needed() {
            wrapper = wrapper.child(paging_bar(pagination));
        }
        nodes.push(wrapper.into());
        nodes
    }

    fn list_item(&self, component: &ListComponent, article: &ArticleSummary, origin: &str) -> Element {
        let href = format!(
            "{}/{}?article={}",
            origin,
            article.article_page.trim_start_matches('/'),
            urlencoding::encode(&article.slug)
        );

        let mut item = Element::new("div").class("cms-cy-posts__item");
        if let Some(image) = &article.featured_image {
            item = item.child(
                Element::new("a")
                    .class("cms-cy-posts__item-image")
                    .attr("href", href.clone())
                    .child(self.image(image, &component.sizing(), &image.title, true)),
            );
        }

        let content = Element::new("div")
            .class("cms-cy-posts__item-content")
            .child(
                Element::new("div")
                    .class("cms-cy-posts__item-date")
                    .attr("style", format!("color: {};", component.project.primary_color))
                    .text(format_date(&article.date_published)),
            )
            .child(
                Element::new("a")
                    .class("cms-cy-posts__item-title")
                    .attr("href", href)
                    .child(Element::new("h3").text(article.title.clone())),
            );
        let content = if article.excerpt.is_empty() {
            content
        } else {
            content.child(
                Element::new("p")
                    .class("cms-cy-posts__item-excerpt")
                    .text(article.excerpt.clone()),
            )
        };

        Element::new("div")
            .class("cms-cy-posts__item-wrapper")
            .child(item.child(content))
    }
}

fn list_variables(
    component: &ListComponent,
    project: &str,
    categories: Vec<String>,
    page: u32,
) -> ArticleListVariables {
    let defaults = ArticleListVariables::default();
    ArticleListVariables {
        project: project.to_owned(),
        categories,
        article_ids: component.article_ids(),
        sort_field: component
            .sort_field()
            .map_or(defaults.sort_field, |field| vec![field]),
        // flat: the server applies `page` on top of it
        offset: component.offset,
        limit: component.page_size(),
        page,
        is_feature_filter_operator: component.featured.operator(),
    }
    .fail_closed()
}

fn paging_bar(pagination: &Pagination) -> Element {
    let step = |url: Option<&String>, class: &'static str, label: &'static str, icon: &'static str| {
        let anchor = match url {
            Some(url) => Element::new("a").attr("href", url.clone()).class(class),
            None => Element::new("a").class(format!("{class} disabled")),
        };
        anchor
            .child(Element::new("span").class("sr-only").text(label))
            .raw(icon)
    };

    Element::new("div")
        .class("cms-cy-posts__paging")
        .child(step(pagination.previous.as_ref(), "previous", "Previous", PREVIOUS_ICON))
        .children(pagination.pages.iter().map(|page| {
            Element::new("a")
                .attr("href", page.url.clone())
                .class(if page.active { "page active" } else { "page" })
                .text(page.number.to_string())
        }))
        .child(step(pagination.next.as_ref(), "next", "Next", NEXT_ICON))
}
