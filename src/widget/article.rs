//! Single article widget.

use super::hooks::PostRenderHook;
use super::location::PageLocation;
use super::{EmptyReason, Fragment, Rendered, Renderer, variables};
use crate::cms::CmsError;
use crate::cms::query::{ARTICLE, ARTICLE_COMPONENT, ComponentVariables, SlugVariables};
use crate::cms::types::{ArticleComponent, ArticleDetail, DownloadFile, FileRef, SLUG_FROM_URL};
use crate::log;
use crate::markup::{Element, Node, dom_id};
use crate::utils::date::format_date;

const GALLERY_STYLE: &str =
    "--swiper-navigation-color: #fff; --swiper-pagination-color: #fff; --swiper-navigation-size: 20px;";

impl Renderer<'_> {
    /// Render the `single-article` component `name` for `location`.
    pub async fn load_article(
        &self,
        name: &str,
        location: &PageLocation,
    ) -> Result<Rendered, CmsError> {
        let component_vars = ComponentVariables {
            project: self.api.project(),
            component: name,
        };
        let component: Option<ArticleComponent> = self
            .client
            .get_data(&ARTICLE_COMPONENT, variables(&component_vars)?)
            .await?
            .first_record(0)?;
        let Some(component) = component else {
            log!("error"; "component \"{}\" is not configured", name);
            return Ok(Rendered::Empty(EmptyReason::ConfigurationMissing));
        };

        let slug = if component.article_slug == SLUG_FROM_URL {
            match location.article_param() {
                Some(slug) => slug,
                None => {
                    log!("warn"; "component \"{}\" could not load article from URL", name);
                    return Ok(Rendered::Empty(EmptyReason::SlugMissing));
                }
            }
        } else {
            component.article_slug.clone()
        };

        let slug_vars = SlugVariables {
            project: self.api.project(),
            slug: &slug,
        };
        let article: Option<ArticleDetail> = self
            .client
            .get_data(&ARTICLE, variables(&slug_vars)?)
            .await?
            .first_record(0)?;
        let Some(article) = article else {
            log!("error"; "component \"{}\" failed to load article \"{}\"", name, slug);
            return Ok(Rendered::Empty(EmptyReason::ArticleMissing));
        };

        let hooks = PostRenderHook::for_gallery(article.gallery_images().len());
        Ok(Rendered::Fragment(Fragment {
            nodes: self.article_markup(name, &component, &article),
            hooks,
        }))
    }

    fn article_markup(
        &self,
        name: &str,
        component: &ArticleComponent,
        article: &ArticleDetail,
    ) -> Vec<Node> {
        let mut nodes = Vec::new();
        if !component.custom_code.is_empty() {
            nodes.push(Node::raw(component.custom_code.clone()));
        }

        let header = Element::new("div")
            .class("cms-cy-post__header")
            .child(
                Element::new("h1")
                    .class("cms-cy-post__title")
                    .text(article.title.clone()),
            )
            .child(
                Element::new("div")
                    .class("cms-cy-post__date")
                    .attr("style", format!("color: {};", component.project.primary_color))
                    .text(format_date(&article.date_published)),
            );

        let downloads = article.downloads();
        let mut media = Element::new("div").class("cms-cy-post__media");
        if let Some(block) = self.media_block(component, article) {
            media = media.child(block);
        }
        if !downloads.is_empty() {
            media = media.child(
                Element::new("div")
                    .class("cms-cy-post__files")
                    .children(downloads.into_iter().map(|file| self.download(file))),
            );
        }

        let content = Element::new("div")
            .class("cms-cy-post__content")
            .child(media)
            .child(
                Element::new("div")
                    .class("cms-cy-post__body")
                    .raw(article.body.clone()),
            );

        nodes.push(
            Element::new("div")
                .id(dom_id(name))
                .class("cms-cy-post__wrapper")
                .child(header)
                .child(content)
                .into(),
        );
        nodes
    }

    /// Plain image, single lightbox image, or dual carousel, by gallery size.
    fn media_block(&self, component: &ArticleComponent, article: &ArticleDetail) -> Option<Element> {
        let sizing = component.sizing();
        let fallback_alt = article
            .article_image
            .as_ref()
            .map_or("", |image| image.title.as_str());
        let alt = |file: &FileRef| -> String {
            if file.title.is_empty() {
                fallback_alt.to_owned()
            } else {
                file.title.clone()
            }
        };
        let gallery = article.gallery_images();

        match gallery.as_slice() {
            &[] => {
                let image = article.article_image.as_ref()?;
                Some(
                    Element::new("div")
                        .class("cms-cy-post__image")
                        .child(self.image(image, &sizing, &image.title, false)),
                )
            }
            &[image] => Some(
                Element::new("div")
                    .class("cms-cy-post__image")
                    .child(self.lightbox_link(image).child(self.image(
                        image,
                        &sizing,
                        &alt(image),
                        true,
                    ))),
            ),
            images => {
                let slides = images.iter().enumerate().map(|(ix, &image)| {
                    Element::new("div").class("swiper-slide").child(
                        self.lightbox_link(image)
                            .child(self.image(image, &sizing, &alt(image), ix > 1)),
                    )
                });
                let thumbs = images.iter().enumerate().map(|(ix, &image)| {
                    Element::new("div")
                        .class("swiper-slide")
                        .child(self.image(image, &sizing, &alt(image), ix > 1))
                });
                Some(
                    Element::new("div")
                        .class("cms-cy-post__gallery")
                        .child(Node::comment("Swiper"))
                        .child(
                            Element::new("div")
                                .attr("style", GALLERY_STYLE)
                                .class("swiper mySwiper2")
                                .child(Element::new("div").class("swiper-wrapper").children(slides))
                                .child(Element::new("div").class("swiper-button-next"))
                                .child(Element::new("div").class("swiper-button-prev")),
                        )
                        .child(
                            Element::new("div")
                                .attr("thumbsSlider", "")
                                .class("swiper mySwiper")
                                .child(Element::new("div").class("swiper-wrapper").children(thumbs)),
                        ),
                )
            }
        }
    }

    fn lightbox_link(&self, image: &FileRef) -> Element {
        Element::new("a")
            .attr("href", self.api.original_asset_url(&image.id))
            .class("glightbox")
            .attr("data-type", "image")
    }

    fn download(&self, file: &DownloadFile) -> Element {
        let has_description = !file.description.is_empty();
        let mut link = Element::new("a")
            .attr_if(has_description, "class", "tooltip")
            .attr("href", self.api.download_url(&file.id))
            .attr("target", "_blank")
            .attr("download", file.filename_download.clone());
        if has_description {
            link = link.child(
                Element::new("span")
                    .class("tooltip_text")
                    .text(file.description.clone()),
            );
        }
        Element::new("div")
            .class("cms-cy-post__file")
            .child(link.text(file.title.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::CannedCms;
    use super::*;
    use crate::cms::CmsApi;
    use serde_json::{Value, json};

    fn component(slug: &str) -> Value {
        json!({ "component_single_article": [{
            "article_slug": slug,
            "custom_code": null,
            "image_width": 800,
            "aspect_ratio": 0.5,
            "fit": "cover",
            "project": { "primary_color": "#0a0", "secondary_color": null }
        }] })
    }

    fn article(gallery: usize) -> Value {
        let gallery: Vec<_> = (1..=gallery)
            .map(|n| json!({ "directus_files_id": { "id": format!("g{n}"), "title": null } }))
            .collect();
        json!({ "Articles": [{
            "title": "Hello & welcome",
            "body": "<p>Trusted <strong>body</strong></p>",
            "date_published": "2024-12-01T09:00:00",
            "is_feature": false,
            "article_image": { "id": "cover", "title": "Cover" },
            "article_categories": [],
            "gallery": gallery,
            "files": []
        }] })
    }

    async fn render(cms: &CannedCms, location: &str) -> Rendered {
        let api = CmsApi::new("https://projectapi.cms.cy", "demo").unwrap();
        let location = PageLocation::parse(location).unwrap();
        Renderer::new(cms, &api, 80)
            .load_article("post", &location)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_component() {
        let cms = CannedCms::new().with(&ARTICLE_COMPONENT, json!({ "component_single_article": null }));
        let rendered = render(&cms, "https://example.com/post.html").await;
        assert_eq!(rendered, Rendered::Empty(EmptyReason::ConfigurationMissing));
    }

    #[tokio::test]
    async fn test_slug_from_url_missing() {
        let cms = CannedCms::new().with(&ARTICLE_COMPONENT, component("url"));
        let rendered = render(&cms, "https://example.com/post.html").await;

        assert_eq!(rendered, Rendered::Empty(EmptyReason::SlugMissing));
        assert!(!cms.was_called(&ARTICLE));
    }

    #[tokio::test]
    async fn test_slug_from_url() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("url"))
            .with(&ARTICLE, article(0));
        render(&cms, "https://example.com/post.html?article=hello-world").await;

        assert_eq!(
            cms.variables_of(&ARTICLE).unwrap(),
            json!({ "project": "demo", "slug": "hello-world" })
        );
    }

    #[tokio::test]
    async fn test_configured_slug_ignores_url() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("about-us"))
            .with(&ARTICLE, article(0));
        render(&cms, "https://example.com/post.html?article=other").await;

        assert_eq!(cms.variables_of(&ARTICLE).unwrap()["slug"], "about-us");
    }

    #[tokio::test]
    async fn test_article_missing() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("gone"))
            .with(&ARTICLE, json!({ "Articles": [] }));
        let rendered = render(&cms, "https://example.com/post.html").await;
        assert_eq!(rendered, Rendered::Empty(EmptyReason::ArticleMissing));
    }

    #[tokio::test]
    async fn test_no_gallery_plain_image() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("hello"))
            .with(&ARTICLE, article(0));
        let rendered = render(&cms, "https://example.com/post.html").await;
        let html = rendered.html();

        assert!(rendered.hooks().is_empty());
        assert!(html.contains(
            r#"<div class="cms-cy-post__image"><img src="https://projectapi.cms.cy/assets/cover?fit=cover&amp;width=800&amp;height=400&amp;quality=80" alt="Cover" width="800" height="400"></div>"#
        ));
        assert!(!html.contains("loading"));
        assert!(!html.contains("glightbox"));
    }

    #[tokio::test]
    async fn test_single_gallery_image() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("hello"))
            .with(&ARTICLE, article(1));
        let rendered = render(&cms, "https://example.com/post.html").await;
        let html = rendered.html();

        assert_eq!(
            rendered.hooks(),
            &[PostRenderHook::Lightbox { selector: ".glightbox" }]
        );
        assert!(html.contains(
            r#"<div class="cms-cy-post__image"><a href="https://projectapi.cms.cy/assets/g1" class="glightbox" data-type="image"><img src="https://projectapi.cms.cy/assets/g1?fit=cover&amp;width=800&amp;height=400&amp;quality=80" alt="Cover" width="800" height="400" loading="lazy"></a></div>"#
        ));
        assert!(!html.contains("swiper"));
    }

    #[tokio::test]
    async fn test_gallery_carousel() {
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("hello"))
            .with(&ARTICLE, article(3));
        let rendered = render(&cms, "https://example.com/post.html").await;
        let html = rendered.html();

        assert_eq!(rendered.hooks().len(), 2);
        assert!(html.contains(r#"<div class="cms-cy-post__gallery"><!-- Swiper --><div style="--swiper-navigation-color: #fff;"#));
        assert!(html.contains(r#"class="swiper mySwiper2"><div class="swiper-wrapper">"#));
        assert!(html.contains(r#"<div class="swiper-button-next"></div><div class="swiper-button-prev"></div>"#));
        assert!(html.contains(r#"<div thumbsSlider="" class="swiper mySwiper">"#));
        assert_eq!(html.matches("swiper-slide").count(), 6);
        assert_eq!(html.matches(r#"class="glightbox""#).count(), 3);
        // third image onwards loads lazily, in both strips
        assert_eq!(html.matches("loading=\"lazy\"").count(), 2);
    }

    #[tokio::test]
    async fn test_header_body_and_files() {
        let mut data = article(0);
        data["Articles"][0]["files"] = json!([
            { "directus_files_id": { "id": "f1", "title": "Menu", "description": "Lunch & dinner", "filename_download": "menu.pdf" } },
            { "directus_files_id": { "id": "f2", "title": "Map", "description": null, "filename_download": "map.png" } }
        ]);
        let cms = CannedCms::new()
            .with(&ARTICLE_COMPONENT, component("hello"))
            .with(&ARTICLE, data);
        let html = render(&cms, "https://example.com/post.html").await.html();

        assert!(html.starts_with(r#"<div id="post" class="cms-cy-post__wrapper"><div class="cms-cy-post__header">"#));
        assert!(html.contains(r#"<h1 class="cms-cy-post__title">Hello &amp; welcome</h1>"#));
        assert!(html.contains(r#"<div class="cms-cy-post__date" style="color: #0a0;">01/12/2024</div>"#));
        assert!(html.contains(
            r#"<div class="cms-cy-post__file"><a class="tooltip" href="https://projectapi.cms.cy/assets/f1?download" target="_blank" download="menu.pdf"><span class="tooltip_text">Lunch &amp; dinner</span>Menu</a></div>"#
        ));
        assert!(html.contains(
            r#"<div class="cms-cy-post__file"><a href="https://projectapi.cms.cy/assets/f2?download" target="_blank" download="map.png">Map</a></div>"#
        ));
        assert!(html.ends_with(
            r#"<div class="cms-cy-post__body"><p>Trusted <strong>body</strong></p></div></div></div>"#
        ));
    }
}
