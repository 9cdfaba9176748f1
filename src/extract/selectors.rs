//! CSS selectors for AFDB product pages.
//!
//! Every selector the field extractor relies on lives here. When the site
//! changes its markup, update the selector and add a fixture to the tests
//! of `extract`.

use scraper::Selector;
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Product name inside the page heading.
pub static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1 span[itemprop=name]"));

/// Brand logo image; the brand is its `title` (or `alt`) attribute.
pub static BRAND_LOGO: LazyLock<Selector> = LazyLock::new(|| selector("div.product-brand img"));

/// Blocks of the description tab; only their own text nodes are read.
pub static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("div#ProductTabDescription div"));

/// Breadcrumb entries, home first.
pub static BREADCRUMB: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"li[class*="breadcrumbs-list"]"#));

/// Images of the product carousel.
pub static CAROUSEL_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector("div.swiper-wrapper img"));

/// Embedded JSON carrying the product's structured data.
pub static STRUCTURED_DATA: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[data-qa="structuredDataProductSEO"]"#));

/// Technical attribute lists.
pub static ATTRIBUTE_LIST: LazyLock<Selector> =
    LazyLock::new(|| selector("dl.ish-productAttributes"));

/// Attribute names inside an attribute list.
pub static ATTRIBUTE_TERM: LazyLock<Selector> = LazyLock::new(|| selector("dt"));

/// Attribute values inside an attribute list.
pub static ATTRIBUTE_VALUE: LazyLock<Selector> = LazyLock::new(|| selector("dd"));

/// Labels of the generic key/value panel.
pub static PANEL_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("label"));
