//! Shared page markup for the integration tests.

use anyhow::Result;
use core::cell::RefCell;
use dom::NodeKey;
use page_enhance::{EnhanceConfig, Enhancer, bootstrap};
use page_host::{ElementFixture, Page, PageFixture};
use std::rc::Rc;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn nav_link(target: &str, label: &str) -> ElementFixture {
    ElementFixture::new("li").child(
        ElementFixture::new("a")
            .class("c-nav__link")
            .attr("href", &format!("#{target}"))
            .text(label),
    )
}

fn group(field: ElementFixture) -> ElementFixture {
    ElementFixture::new("div").class("c-form__group").child(field)
}

/// Header with nav, three stacked 1000px sections, a contact form and the cookie banner.
pub fn landing_page() -> PageFixture {
    PageFixture::new()
        .viewport(1280, 800)
        .body_child(
            ElementFixture::new("header")
                .class("l-header")
                .rect(0.0, 0.0, 1280.0, 80.0)
                .child(
                    ElementFixture::new("img")
                        .class("c-logo__img")
                        .attr("src", "logo.svg")
                        .rect(20.0, 10.0, 120.0, 60.0),
                )
                .child(
                    ElementFixture::new("nav")
                        .class("c-nav")
                        .child(
                            ElementFixture::new("button")
                                .class("c-nav__toggle")
                                .attr("aria-expanded", "false"),
                        )
                        .child(ElementFixture::new("ul").class("c-nav__list").children([
                            nav_link("home", "Start"),
                            nav_link("about", "Über uns"),
                            nav_link("contact", "Kontakt"),
                        ])),
                ),
        )
        .body_child(
            ElementFixture::new("section")
                .id("home")
                .class("l-hero")
                .rect(0.0, 0.0, 1280.0, 1000.0)
                .child(ElementFixture::new("img").attr("src", "hero.jpg").rect(0.0, 100.0, 1280.0, 600.0)),
        )
        .body_child(
            ElementFixture::new("section")
                .id("about")
                .rect(0.0, 1000.0, 1280.0, 1000.0)
                .child(
                    ElementFixture::new("div")
                        .class("c-card")
                        .rect(100.0, 1500.0, 400.0, 200.0),
                )
                .child(
                    ElementFixture::new("span")
                        .class("c-stat")
                        .attr("data-count", "250")
                        .text("0")
                        .rect(100.0, 1200.0, 200.0, 50.0),
                )
                .child(
                    ElementFixture::new("span")
                        .class("c-stat")
                        .attr("data-count", "lots")
                        .text("viele")
                        .rect(400.0, 1200.0, 200.0, 50.0),
                )
                .child(
                    ElementFixture::new("img")
                        .class("c-gallery__img")
                        .attr("src", "team.jpg")
                        .loading_image()
                        .rect(600.0, 1300.0, 400.0, 300.0),
                )
                .child(
                    ElementFixture::new("a")
                        .class("c-button")
                        .attr("href", "#contact")
                        .text("Kontakt aufnehmen")
                        .rect(100.0, 1800.0, 200.0, 50.0),
                ),
        )
        .body_child(
            ElementFixture::new("section")
                .id("contact")
                .rect(0.0, 2000.0, 1280.0, 1000.0)
                .child(
                    ElementFixture::new("form")
                        .class("c-form")
                        .id("contact-form")
                        .children([
                            group(
                                ElementFixture::new("input")
                                    .attr("name", "name")
                                    .attr("required", "")
                                    .rect(100.0, 2100.0, 400.0, 40.0),
                            ),
                            group(
                                ElementFixture::new("input")
                                    .attr("type", "email")
                                    .attr("name", "email")
                                    .attr("required", "")
                                    .rect(100.0, 2160.0, 400.0, 40.0),
                            ),
                            group(
                                ElementFixture::new("input")
                                    .attr("type", "tel")
                                    .attr("name", "phone")
                                    .rect(100.0, 2220.0, 400.0, 40.0),
                            ),
                            group(
                                ElementFixture::new("textarea")
                                    .attr("name", "message")
                                    .attr("required", "")
                                    .rect(100.0, 2280.0, 400.0, 120.0),
                            ),
                            group(
                                ElementFixture::new("input")
                                    .attr("type", "checkbox")
                                    .attr("name", "privacy")
                                    .attr("required", "")
                                    .rect(100.0, 2420.0, 20.0, 20.0),
                            ),
                            ElementFixture::new("button")
                                .attr("type", "submit")
                                .text("Senden")
                                .rect(100.0, 2460.0, 200.0, 50.0),
                        ]),
                ),
        )
        .body_child(
            ElementFixture::new("div")
                .id("cookie-banner")
                .attr("style", "display: none")
                .child(ElementFixture::new("button").id("cookie-accept").text("Akzeptieren"))
                .child(ElementFixture::new("button").id("cookie-decline").text("Ablehnen")),
        )
}

/// Build `fixture`, bootstrap the engine and settle the first visibility checks.
pub fn boot(fixture: &PageFixture) -> Result<(Page, Rc<RefCell<Enhancer>>)> {
    boot_with(fixture, EnhanceConfig::default())
}

pub fn boot_with(
    fixture: &PageFixture,
    config: EnhanceConfig,
) -> Result<(Page, Rc<RefCell<Enhancer>>)> {
    init_logger();
    let mut page = fixture.build()?;
    let enhancer = Rc::new(RefCell::new(Enhancer::new(config)));
    bootstrap(&mut page, &enhancer);
    page.flush();
    Ok((page, enhancer))
}

pub fn find(page: &Page, selector: &str) -> NodeKey {
    page.document()
        .query_selector(selector)
        .expect("fixture element")
}

pub fn style(page: &Page, node: NodeKey, property: &str) -> Option<String> {
    page.document().style(node, property).map(str::to_owned)
}
