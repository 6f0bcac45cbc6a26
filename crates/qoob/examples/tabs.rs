//! Tab strip demo: class toggling, visibility and event dispatch.
//!
//! Run with: cargo run --example tabs

use qoob::{Document, Event, OutlineConfig, Selector};
use std::cell::RefCell;
use std::rc::Rc;

fn main() -> qoob::Result<()> {
    tracing_subscriber::fmt().init();

    let mut doc = Document::from_json(&serde_json::json!({
        "tag": "div",
        "attrs": { "id": "tabs" },
        "children": [
            { "tag": "nav", "children": [
                { "tag": "a", "attrs": { "class": "tab active", "data-panel": "first" }, "children": ["First"] },
                { "tag": "a", "attrs": { "class": "tab", "data-panel": "second" }, "children": ["Second"] }
            ]},
            { "tag": "section", "attrs": { "id": "first" }, "children": ["first panel"] },
            { "tag": "section", "attrs": { "id": "second", "style": "display: none" }, "children": ["second panel"] }
        ]
    }))?;
    doc.finish_loading();

    // Record which panel each click asks for; the closure is shared by
    // every tab, the event target tells them apart.
    let clicked: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    qoob::on(&mut doc, &"a.tab".into(), "click", move |e: &Event| {
        sink.borrow_mut().push(format!("node {}", e.target));
    })?;

    // Activate the second tab the way a click handler would.
    let second_tab = qoob::first(&doc, &"a[data-panel=second]".into())?.unwrap();
    qoob::trigger(&doc, &second_tab.into(), "click")?;

    qoob::remove_class(&mut doc, &"a.tab".into(), "active")?;
    qoob::add_class(&mut doc, &second_tab.into(), "active")?;
    qoob::hide(&mut doc, &"section".into())?;
    qoob::show(&mut doc, &"#second".into(), None)?;

    println!("clicks seen: {:?}", clicked.borrow());
    println!(
        "active tab text: {:?}",
        qoob::text(&doc, &"a.active".into())?
    );
    println!(
        "panel display values: {:?}",
        qoob::style(&doc, &"section".into(), "display")?
    );
    println!(
        "\n{}",
        qoob::outline(&doc, doc.root_id(), &OutlineConfig::default())?
    );

    // The Absent selector goes through the same paths and does nothing.
    qoob::hide(&mut doc, &Selector::None)?;
    Ok(())
}
