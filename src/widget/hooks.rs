//! Post-render hooks: initializers for the lightbox and carousel libraries.
//!
//! A widget only returns hooks; whoever mounts the fragment emits
//! [`hook_script`] after it, so the libraries find the mounted markup.

/// Selector the lightbox binds to.
pub const LIGHTBOX_SELECTOR: &str = ".glightbox";
/// Thumbnail strip of the article gallery.
pub const THUMBS_SELECTOR: &str = ".mySwiper";
/// Main slider of the article gallery.
pub const MAIN_SELECTOR: &str = ".mySwiper2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostRenderHook {
    /// `GLightbox({ selector })`
    Lightbox { selector: &'static str },
    /// Two Swiper instances: a thumbnail strip driving the main slider.
    ThumbCarousel {
        thumbs: &'static str,
        main: &'static str,
    },
}

impl PostRenderHook {
    /// Hooks needed by an article gallery of `images` images.
    pub fn for_gallery(images: usize) -> Vec<Self> {
        let mut hooks = Vec::new();
        if images >= 1 {
            hooks.push(Self::Lightbox {
                selector: LIGHTBOX_SELECTOR,
            });
        }
        if images >= 2 {
            hooks.push(Self::ThumbCarousel {
                thumbs: THUMBS_SELECTOR,
                main: MAIN_SELECTOR,
            });
        }
        hooks
    }

    /// JavaScript statement(s) running this hook.
    pub fn script(&self) -> String {
        match self {
            Self::Lightbox { selector } => format!(
                "if(typeof GLightbox==='function'){{GLightbox({{selector:{}}});}}",
                js_string(selector)
            ),
            Self::ThumbCarousel { thumbs, main } => format!(
                "if(typeof Swiper==='function'){{\
                 var thumbs=new Swiper({},{{spaceBetween:10,slidesPerView:4,freeMode:true,watchSlidesProgress:true}});\
                 new Swiper({},{{spaceBetween:10,navigation:{{nextEl:'.swiper-button-next',prevEl:'.swiper-button-prev'}},thumbs:{{swiper:thumbs}}}});}}",
                js_string(thumbs),
                js_string(main)
            ),
        }
    }
}

/// JSON string literal, valid as a JavaScript string.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "''".to_owned())
}

/// One `<script>` running `hooks` in order, each distinct hook once, after
/// the document is parsed. Empty when there is nothing to run.
pub fn hook_script<'a>(hooks: impl IntoIterator<Item = &'a PostRenderHook>) -> String {
    let mut unique: Vec<&PostRenderHook> = Vec::new();
    for hook in hooks {
        if !unique.contains(&hook) {
            unique.push(hook);
        }
    }
    if unique.is_empty() {
        return String::new();
    }

    let body: String = unique.iter().map(|hook| hook.script()).collect();
    format!(
        "<script>(function(init){{if(document.readyState==='loading'){{document.addEventListener('DOMContentLoaded',init);}}else{{init();}}}})(function(){{{body}}});</script>"
    )
}
