//! Form accessor demo: values, flag attributes and data attributes.
//!
//! Run with: cargo run --example form_fill

use qoob::Document;

fn main() -> qoob::Result<()> {
    tracing_subscriber::fmt().init();

    let mut doc = Document::from_json(&serde_json::json!({
        "tag": "form",
        "children": [
            { "tag": "input", "attrs": { "name": "user", "type": "text" } },
            { "tag": "input", "attrs": { "name": "mail", "type": "text" } },
            { "tag": "button", "children": ["Send"] }
        ]
    }))?;

    qoob::set_val(&mut doc, &"input[name=user]".into(), "ada")?;
    qoob::set_val(&mut doc, &"input[name=mail]".into(), "ada@example.org")?;
    qoob::set_data(&mut doc, &"input".into(), "validated", "yes")?;
    qoob::state(&mut doc, &"button".into(), "disabled")?;

    println!("values: {:?}", qoob::val(&doc, &"input".into())?);
    println!("datasets: {:?}", qoob::dataset(&doc, &"input".into())?);
    println!(
        "button disabled: {:?}",
        qoob::attr(&doc, &"button".into(), "disabled")?
    );
    println!(
        "form markup:\n{}",
        qoob::outer_markup(&doc, qoob::first(&doc, &"form".into())?.unwrap())?
    );
    Ok(())
}
