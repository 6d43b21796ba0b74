//! Lazy loading, smooth scrolling, ripple, hover, scroll-to-top and the cookie banner.

mod common;

use anyhow::Result;
use common::{boot, find, landing_page, style};
use page_host::{ElementFixture, PageFixture, ScrollBehavior};

#[test]
fn only_non_critical_media_is_deferred() -> Result<()> {
    let fixture = PageFixture::new()
        .body_child(ElementFixture::new("img").class("c-logo__img").attr("src", "logo.svg"))
        .body_child(
            ElementFixture::new("div")
                .class("l-hero")
                .child(ElementFixture::new("img").attr("src", "hero.jpg")),
        )
        .body_child(ElementFixture::new("img").attr("src", "key.png").attr("data-critical", ""))
        .body_child(ElementFixture::new("img").attr("src", "eager.png").attr("loading", "eager"))
        .body_child(ElementFixture::new("img").attr("src", "plain.png"))
        .body_child(ElementFixture::new("video").attr("src", "clip.mp4"));
    let (page, _enhancer) = boot(&fixture)?;
    let loading = |selector: &str| page.document().attr(find(&page, selector), "loading");

    assert_eq!(loading(r#"img[src="logo.svg"]"#), None);
    assert_eq!(loading(r#"img[src="hero.jpg"]"#), None);
    assert_eq!(loading(r#"img[src="key.png"]"#), None);
    assert_eq!(loading(r#"img[src="eager.png"]"#), Some("eager"));
    assert_eq!(loading(r#"img[src="plain.png"]"#), Some("lazy"));
    assert_eq!(loading("video"), Some("lazy"));
    Ok(())
}

#[test]
fn in_page_links_scroll_below_the_header() -> Result<()> {
    let fixture = landing_page()
        .body_child(ElementFixture::new("a").attr("href", "#missing").text("Nirgendwo"))
        .body_child(ElementFixture::new("a").attr("href", "#").text("Oben"));
    let (mut page, _enhancer) = boot(&fixture)?;

    page.click(find(&page, r##"a.c-button[href="#contact"]"##));
    assert!((page.scroll_y() - 1920.0).abs() < 0.5, "scrolled to {}", page.scroll_y());
    assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));
    assert_eq!(page.location().fragment(), None, "default action was prevented");

    page.click(find(&page, r##"a[href="#missing"]"##));
    assert_eq!(page.location().fragment(), Some("missing"));
    assert!((page.scroll_y() - 1920.0).abs() < 0.5);

    page.click(find(&page, r##"a[href="#"]"##));
    assert_eq!(page.location().fragment(), Some(""));
    Ok(())
}

#[test]
fn ripple_grows_from_the_click_point_and_is_removed() -> Result<()> {
    let fixture = PageFixture::new().body_child(
        ElementFixture::new("button")
            .class("btn")
            .attr("type", "button")
            .text("Mehr")
            .rect(100.0, 500.0, 200.0, 50.0),
    );
    let (mut page, _enhancer) = boot(&fixture)?;
    let button = find(&page, ".btn");

    page.click_at(button, 120.0, 510.0);
    let ripple = page.document().query_selector_in(button, "span").expect("ripple");
    assert_eq!(style(&page, ripple, "left").as_deref(), Some("20px"));
    assert_eq!(style(&page, ripple, "top").as_deref(), Some("10px"));
    assert_eq!(style(&page, ripple, "width").as_deref(), Some("0"));
    assert_eq!(style(&page, button, "position").as_deref(), Some("relative"));
    assert_eq!(style(&page, button, "overflow").as_deref(), Some("hidden"));

    page.advance_by(16);
    assert_eq!(style(&page, ripple, "width").as_deref(), Some("400px"));
    assert_eq!(style(&page, ripple, "height").as_deref(), Some("400px"));
    assert_eq!(style(&page, ripple, "opacity").as_deref(), Some("0"));

    page.advance_by(584);
    assert!(!page.document().exists(ripple));
    assert_eq!(page.document().text_content(button), "Mehr");
    Ok(())
}

#[test]
fn cards_and_buttons_lift_on_hover() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    let card = find(&page, ".c-card");
    let button = find(&page, "a.c-button");
    let link = find(&page, ".c-nav__link");

    page.hover(card);
    assert_eq!(
        style(&page, card, "transition").as_deref(),
        Some("all 0.4s cubic-bezier(0.4, 0, 0.2, 1)")
    );
    assert_eq!(style(&page, card, "transform").as_deref(), Some("translateY(-8px) scale(1.02)"));
    page.unhover(card);
    assert_eq!(style(&page, card, "transform").as_deref(), Some("translateY(0) scale(1)"));

    page.hover(button);
    assert_eq!(style(&page, button, "transform").as_deref(), Some("translateY(-3px) scale(1.05)"));
    page.unhover(button);
    assert_eq!(style(&page, button, "transform").as_deref(), Some("translateY(0) scale(1)"));

    page.hover(link);
    assert_eq!(style(&page, link, "transition").as_deref(), Some("all 0.3s ease-out"));
    assert_eq!(style(&page, link, "transform"), None);
    Ok(())
}

#[test]
fn scroll_to_top_button_tracks_the_offset() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    let button = find(&page, ".c-scroll-top");
    let document = page.document();
    assert_eq!(document.parent(button), Some(document.body()));
    assert_eq!(document.attr(button, "aria-label"), Some("Nach oben scrollen"));
    assert_eq!(document.text_content(button), "↑");
    assert_eq!(style(&page, button, "visibility").as_deref(), Some("hidden"));
    assert_eq!(style(&page, button, "position").as_deref(), Some("fixed"));

    page.scroll_to(400.0, ScrollBehavior::Auto);
    assert_eq!(style(&page, button, "opacity").as_deref(), Some("1"));
    assert_eq!(style(&page, button, "visibility").as_deref(), Some("visible"));
    assert_eq!(style(&page, button, "transform").as_deref(), Some("translateY(0)"));

    page.advance_by(200);
    page.scroll_to(100.0, ScrollBehavior::Auto);
    assert_eq!(style(&page, button, "opacity").as_deref(), Some("0"));
    assert_eq!(style(&page, button, "transform").as_deref(), Some("translateY(20px)"));

    page.advance_by(200);
    page.scroll_to(1000.0, ScrollBehavior::Auto);
    page.hover(button);
    assert_eq!(style(&page, button, "transform").as_deref(), Some("translateY(-5px) scale(1.1)"));
    assert_eq!(style(&page, button, "box-shadow").as_deref(), Some("var(--shadow-hover)"));
    page.unhover(button);
    assert_eq!(style(&page, button, "box-shadow").as_deref(), Some("var(--shadow-lg)"));

    page.click(button);
    assert!(page.scroll_y().abs() < 0.5);
    assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));
    Ok(())
}

#[test]
fn cookie_banner_shows_after_delay_and_stores_acceptance() -> Result<()> {
    let (mut page, enhancer) = boot(&landing_page())?;
    let banner = find(&page, "#cookie-banner");
    let key = enhancer.borrow().config().consent_key.clone();

    page.advance_by(999);
    assert_eq!(style(&page, banner, "display").as_deref(), Some("none"));
    page.advance_by(1);
    assert_eq!(style(&page, banner, "display").as_deref(), Some("block"));
    page.advance_by(16);
    assert_eq!(style(&page, banner, "transform").as_deref(), Some("translateY(0)"));

    page.click(find(&page, "#cookie-accept"));
    assert_eq!(page.storage_get(&key).as_deref(), Some("true"));
    assert_eq!(style(&page, banner, "transform").as_deref(), Some("translateY(100%)"));
    page.advance_by(499);
    assert_eq!(style(&page, banner, "display").as_deref(), Some("block"));
    page.advance_by(1);
    assert_eq!(style(&page, banner, "display").as_deref(), Some("none"));
    Ok(())
}

#[test]
fn stored_decision_keeps_the_banner_hidden() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page().stored("cookiesAccepted", "false"))?;
    let banner = find(&page, "#cookie-banner");
    page.advance_by(3000);
    assert_eq!(style(&page, banner, "display").as_deref(), Some("none"));
    assert_eq!(page.pending_timer_count(), 0);
    Ok(())
}

#[test]
fn declining_stores_false() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    page.advance_by(1100);
    page.click(find(&page, "#cookie-decline"));
    assert_eq!(page.storage_get("cookiesAccepted").as_deref(), Some("false"));
    Ok(())
}
