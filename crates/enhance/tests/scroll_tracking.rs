//! Scroll spy, reveal, count-up and image fade over the visibility platform.

mod common;

use anyhow::Result;
use common::{boot, find, landing_page, style};
use core::cell::Cell;
use dom::NodeKey;
use page_enhance::{ObservationMode, ViewportTrigger, VisibilityPolicy};
use page_host::{Page, ScrollBehavior};
use std::rc::Rc;

fn active_links(page: &Page) -> Vec<String> {
    page.document()
        .query_selector_all(".c-nav__link.is-active")
        .into_iter()
        .filter_map(|link| page.document().attr(link, "href").map(str::to_owned))
        .collect()
}

#[test]
fn exactly_one_link_follows_the_scrolled_section() -> Result<()> {
    let (mut page, enhancer) = boot(&landing_page())?;
    assert_eq!(active_links(&page), ["#home"]);

    for (offset, expected) in [
        (900.0, "#about"),
        (1900.0, "#contact"),
        (950.0, "#about"),
        (0.0, "#home"),
    ] {
        page.scroll_to(offset, ScrollBehavior::Auto);
        assert_eq!(active_links(&page), [expected], "at scroll offset {offset}");
        let link = find(&page, ".c-nav__link.is-active");
        assert_eq!(page.document().attr(link, "aria-current"), Some("page"));
    }
    assert_eq!(
        enhancer.borrow().navigation().active_section.as_deref(),
        Some("home")
    );
    let inactive = page.document().query_selector_all(".c-nav__link:not(.is-active)");
    assert_eq!(inactive.len(), 2);
    assert!(
        inactive
            .iter()
            .all(|link| !page.document().has_attr(*link, "aria-current"))
    );
    Ok(())
}

#[test]
fn reveal_runs_once_across_enter_exit_cycles() -> Result<()> {
    let (mut page, enhancer) = boot(&landing_page())?;
    let card = find(&page, ".c-card");
    assert_eq!(style(&page, card, "opacity"), None, "card starts below the fold");
    let registrations = enhancer.borrow().viewport().registration_count();

    page.scroll_to(1200.0, ScrollBehavior::Auto);
    assert_eq!(style(&page, card, "opacity").as_deref(), Some("0"));
    assert_eq!(style(&page, card, "transform").as_deref(), Some("translateY(30px)"));
    page.advance_by(16);
    assert_eq!(style(&page, card, "opacity").as_deref(), Some("0"), "needs a second frame");
    page.advance_by(16);
    assert_eq!(style(&page, card, "opacity").as_deref(), Some("1"));
    assert_eq!(style(&page, card, "transform").as_deref(), Some("translateY(0)"));
    assert!(enhancer.borrow().viewport().registration_count() < registrations);

    page.scroll_to(0.0, ScrollBehavior::Auto);
    page.scroll_to(1200.0, ScrollBehavior::Auto);
    page.advance_by(64);
    assert_eq!(style(&page, card, "opacity").as_deref(), Some("1"));
    assert_eq!(style(&page, card, "transform").as_deref(), Some("translateY(0)"));
    Ok(())
}

#[test]
fn counter_runs_to_its_target() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    let counter = find(&page, r#"[data-count="250"]"#);
    let ignored = find(&page, r#"[data-count="lots"]"#);

    page.scroll_to(900.0, ScrollBehavior::Auto);
    assert_eq!(page.document().text_content(counter), "2");
    page.advance_by(1000);
    let halfway: i64 = page.document().text_content(counter).parse()?;
    assert!((100..250).contains(&halfway), "halfway value {halfway}");
    page.advance_by(1500);
    assert_eq!(page.document().text_content(counter), "250");
    assert_eq!(page.pending_frame_count(), 0);
    assert_eq!(page.document().text_content(ignored), "viele");
    Ok(())
}

#[test]
fn images_fade_in_once_visible_and_loaded() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    let hero = find(&page, r#"img[src="hero.jpg"]"#);
    let team = find(&page, r#"img[src="team.jpg"]"#);
    assert_eq!(style(&page, hero, "opacity").as_deref(), Some("1"));
    assert_eq!(style(&page, hero, "transform").as_deref(), Some("scale(1)"));
    assert_eq!(style(&page, team, "opacity").as_deref(), Some("0"));
    assert_eq!(style(&page, team, "transform").as_deref(), Some("scale(0.95)"));

    page.scroll_to(1000.0, ScrollBehavior::Auto);
    assert_eq!(style(&page, team, "opacity").as_deref(), Some("0"), "still decoding");
    page.complete_image_load(team);
    assert_eq!(style(&page, team, "opacity").as_deref(), Some("1"));
    assert_eq!(style(&page, team, "transform").as_deref(), Some("scale(1)"));
    Ok(())
}

#[test]
fn features_with_the_same_policy_share_one_observer() -> Result<()> {
    let (page, enhancer) = boot(&landing_page())?;
    // Scroll spy band, reveal and image fade at 0.1, count-up at 0.5.
    assert_eq!(enhancer.borrow().viewport().observer_count(), 3);
    assert_eq!(page.visibility_observer_count(), 3);
    Ok(())
}

#[test]
fn target_stays_watched_until_its_last_registration_is_dropped() -> Result<()> {
    let (mut page, _enhancer) = boot(&landing_page())?;
    let card = find(&page, ".c-card");
    let trigger = ViewportTrigger::new();
    let policy = VisibilityPolicy::threshold(0.1);
    let (first_hits, second_hits) = (Rc::new(Cell::new(0_u32)), Rc::new(Cell::new(0_u32)));

    let counter = Rc::clone(&first_hits);
    let first = trigger.observe(
        &mut page,
        card,
        policy,
        ObservationMode::Persistent,
        Rc::new(move |_: &mut Page, _: NodeKey| counter.set(counter.get() + 1)),
    );
    let counter = Rc::clone(&second_hits);
    let second = trigger.observe(
        &mut page,
        card,
        policy,
        ObservationMode::Persistent,
        Rc::new(move |_: &mut Page, _: NodeKey| counter.set(counter.get() + 1)),
    );
    assert_eq!(trigger.observer_count(), 1);
    assert_eq!(trigger.registration_count(), 2);
    page.flush();

    trigger.unobserve(&mut page, first);
    page.scroll_to(1200.0, ScrollBehavior::Auto);
    assert_eq!((first_hits.get(), second_hits.get()), (0, 1));

    page.scroll_to(0.0, ScrollBehavior::Auto);
    trigger.unobserve(&mut page, second);
    assert_eq!(trigger.registration_count(), 0);
    page.scroll_to(1200.0, ScrollBehavior::Auto);
    assert_eq!((first_hits.get(), second_hits.get()), (0, 1));
    Ok(())
}
