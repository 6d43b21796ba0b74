//! Event dispatch, default actions and the virtual clock.

use anyhow::Result;
use core::cell::RefCell;
use dom::Document;
use page_host::{
    ElementFixture, EventKind, EventTarget, HostConfig, Page, PageFixture, ReadyState, Scheduler,
};
use std::rc::Rc;
use url::Url;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn form_page() -> Result<Page> {
    PageFixture::new()
        .url("https://example.com/site/index.html")
        .body_child(
            ElementFixture::new("form")
                .class("c-form")
                .attr("action", "send.html")
                .child(ElementFixture::new("input").attr("name", "email"))
                .child(
                    ElementFixture::new("button")
                        .attr("type", "submit")
                        .child(ElementFixture::new("span").class("label").text("Send")),
                ),
        )
        .body_child(ElementFixture::new("a").attr("href", "#about").text("About"))
        .body_child(ElementFixture::new("a").attr("href", "privacy.html").text("Privacy"))
        .body_child(ElementFixture::new("section").id("about").rect(0.0, 0.0, 1280.0, 3000.0))
        .build()
}

#[test]
fn click_bubbles_to_document_and_window() -> Result<()> {
    init_logger();
    let mut page = form_page()?;
    let label = page.document().query_selector(".label").expect("fixture element");
    let seen = Rc::new(RefCell::new(Vec::new()));

    for target in [EventTarget::Window, EventTarget::Document] {
        let seen = Rc::clone(&seen);
        page.on(target, EventKind::Click, move |_, event| {
            seen.borrow_mut().push(event.current_target);
            event.prevent_default();
        });
    }
    let form = page.document().query_selector("form").expect("fixture element");
    let log = Rc::clone(&seen);
    page.on(EventTarget::Node(form), EventKind::Click, move |_, event| {
        log.borrow_mut().push(event.current_target);
    });

    page.click(label);
    assert_eq!(
        *seen.borrow(),
        vec![EventTarget::Node(form), EventTarget::Document, EventTarget::Window],
        "listeners should run innermost first"
    );
    assert!(page.navigations().is_empty(), "prevented click must not submit");
    Ok(())
}

#[test]
fn stop_propagation_halts_bubbling() -> Result<()> {
    let mut page = form_page()?;
    let form = page.document().query_selector("form").expect("fixture element");
    let reached_window = Rc::new(RefCell::new(false));
    page.on(EventTarget::Node(form), EventKind::Submit, |_, event| {
        event.stop_propagation();
        event.prevent_default();
    });
    let flag = Rc::clone(&reached_window);
    page.on(EventTarget::Window, EventKind::Submit, move |_, _| {
        *flag.borrow_mut() = true;
    });
    page.submit(form);
    assert!(!*reached_window.borrow());
    assert!(page.navigations().is_empty());
    Ok(())
}

#[test]
fn submit_button_click_navigates_to_form_action() -> Result<()> {
    let mut page = form_page()?;
    let label = page.document().query_selector(".label").expect("fixture element");
    page.click(label);
    let targets: Vec<&str> = page.navigations().iter().map(url::Url::as_str).collect();
    assert_eq!(targets, vec!["https://example.com/site/send.html"]);
    Ok(())
}

#[test]
fn anchors_navigate_or_set_the_fragment() -> Result<()> {
    let mut page = form_page()?;
    let anchors = page.document().query_selector_all("a");
    page.click(anchors[0]);
    assert_eq!(page.location().fragment(), Some("about"));
    assert!(page.navigations().is_empty(), "fragment links stay on the page");

    page.click(anchors[1]);
    assert_eq!(page.location().path(), "/site/privacy.html");
    assert_eq!(page.navigations().len(), 1);
    Ok(())
}

#[test]
fn disabled_buttons_swallow_clicks() -> Result<()> {
    let mut page = form_page()?;
    let button = page.document().query_selector("button").expect("fixture element");
    page.document_mut().set_disabled(button, true);
    page.click(button);
    assert!(page.navigations().is_empty());
    Ok(())
}

#[test]
fn timers_fire_before_frames_at_the_same_instant() {
    let mut page = PageFixture::new().build().expect("default fixture builds");
    let order = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&order);
    page.request_animation_frame(move |page: &mut Page| {
        log.borrow_mut().push(format!("frame@{}", page.now_ms()));
        let log = Rc::clone(&log);
        page.request_animation_frame(move |page: &mut Page| {
            log.borrow_mut().push(format!("next-frame@{}", page.now_ms()));
        });
    });
    let log = Rc::clone(&order);
    page.set_timeout(
        16,
        Box::new(move |page: &mut Page| log.borrow_mut().push(format!("timer@{}", page.now_ms()))),
    );

    page.advance_by(40);
    assert_eq!(
        *order.borrow(),
        vec!["timer@16", "frame@16", "next-frame@32"],
        "ties run the timer first and nested frames wait a frame"
    );
    assert_eq!(page.now_ms(), 40);
}

#[test]
fn cleared_timeouts_do_not_run() {
    let mut page = PageFixture::new().build().expect("default fixture builds");
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    let id = page.set_timeout(100, Box::new(move |_: &mut Page| *counter.borrow_mut() += 1));
    assert!(page.is_timer_pending(id));
    page.clear_timeout(id);
    page.advance_by(500);
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn zero_frame_interval_in_a_literal_config_still_schedules_frames() -> Result<()> {
    let config = HostConfig {
        viewport_width: 800,
        viewport_height: 600,
        frame_interval_ms: 0,
    };
    let mut page = Page::new(Document::new(), Url::parse("https://example.com/")?, config);
    page.advance_by(5);
    let ran_at = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&ran_at);
    page.request_animation_frame(move |page: &mut Page| {
        *slot.borrow_mut() = Some(page.now_ms());
    });
    page.advance_by(10);
    assert_eq!(*ran_at.borrow(), Some(6));
    Ok(())
}

#[test]
fn scrolling_is_clamped_to_the_document() -> Result<()> {
    let mut page = form_page()?;
    page.scroll_to(-50.0, page_host::ScrollBehavior::Auto);
    assert!(page.scroll_y().abs() < f64::EPSILON);
    page.scroll_to(10_000.0, page_host::ScrollBehavior::Smooth);
    assert!((page.scroll_y() - 2200.0).abs() < f64::EPSILON, "3000 tall page, 800 tall viewport");
    Ok(())
}

#[test]
fn finish_loading_fires_dom_content_loaded_once() -> Result<()> {
    let mut page = PageFixture::new().ready_state(ReadyState::Loading).build()?;
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    page.on(EventTarget::Document, EventKind::DomContentLoaded, move |page, _| {
        assert_eq!(page.ready_state(), ReadyState::Interactive);
        *counter.borrow_mut() += 1;
    });
    page.finish_loading();
    page.finish_loading();
    assert_eq!(*fired.borrow(), 1);
    assert_eq!(page.ready_state(), ReadyState::Complete);
    Ok(())
}

#[test]
fn storage_is_seeded_from_the_fixture() -> Result<()> {
    let mut page = PageFixture::new().stored("cookiesAccepted", "false").build()?;
    assert_eq!(page.storage_get("cookiesAccepted").as_deref(), Some("false"));
    page.storage_remove("cookiesAccepted");
    assert_eq!(page.storage_get("cookiesAccepted"), None);
    Ok(())
}

#[test]
fn json_fixture_builds_the_same_tree() -> Result<()> {
    let fixture = PageFixture::from_json(
        r#"{
            "url": "https://shop.example/",
            "viewport": { "width": 375, "height": 667 },
            "ready_state": "loading",
            "body": [
                { "tag": "header", "attrs": { "class": "l-header" },
                  "rect": { "x": 0, "y": 0, "width": 375, "height": 72 } },
                { "tag": "img", "attrs": { "src": "a.jpg" }, "complete": false }
            ]
        }"#,
    )?;
    let page = fixture.build()?;
    let document = page.document();
    let header = document.query_selector(".l-header").expect("fixture element");
    assert!((document.offset_height(header) - 72.0).abs() < f64::EPSILON);
    let img = document.query_selector("img").expect("fixture element");
    assert!(!document.is_complete(img));
    assert!((page.viewport_width() - 375.0).abs() < f64::EPSILON);
    assert_eq!(page.ready_state(), ReadyState::Loading);
    Ok(())
}
