//! Class list operations.

use crate::query::{each, each_mut, Selector};
use dom::{Document, Result};

/// Add the given class to every matched element. Idempotent: an element
/// never ends up with a duplicate class.
pub fn add_class(doc: &mut Document, selector: &Selector, name: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| doc.add_class(id, name))
}

/// Add several classes to every matched element.
pub fn add_classes(doc: &mut Document, selector: &Selector, names: &[&str]) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        for name in names {
            doc.add_class(id, name)?;
        }
        Ok(())
    })
}

/// Remove the given class from every matched element.
pub fn remove_class(doc: &mut Document, selector: &Selector, name: &str) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| doc.remove_class(id, name))
}

/// Remove several classes from every matched element.
pub fn remove_classes(doc: &mut Document, selector: &Selector, names: &[&str]) -> Result<()> {
    each_mut(doc, selector, |doc, id, _| {
        for name in names {
            doc.remove_class(id, name)?;
        }
        Ok(())
    })
}

/// Whether the class exists on the matched element(s). True if any one of
/// several matched elements has it.
pub fn has_class(doc: &Document, selector: &Selector, name: &str) -> Result<bool> {
    let mut truth = false;
    each(doc, selector, |id, _| {
        if doc.has_class(id, name).unwrap_or(false) {
            truth = true;
        }
    })?;
    Ok(truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::attr;

    fn fixture() -> Document {
        Document::from_json(&serde_json::json!({
            "tag": "ul",
            "children": [
                { "tag": "li", "attrs": { "class": "item" } },
                { "tag": "li", "attrs": { "class": "item active" } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_add_class_idempotent() {
        let mut doc = fixture();
        add_class(&mut doc, &"li".into(), "on").unwrap();
        add_class(&mut doc, &"li".into(), "on").unwrap();

        assert!(has_class(&doc, &"li".into(), "on").unwrap());
        assert_eq!(
            attr(&doc, &"li".into(), "class").unwrap().unwrap(),
            vec![
                Some("item on".to_string()),
                Some("item active on".to_string())
            ]
        );
    }

    #[test]
    fn test_has_class_any_semantics() {
        let doc = fixture();
        // Only one of the two items is active, but the bulk answer is true.
        assert!(has_class(&doc, &"li".into(), "active").unwrap());
        assert!(!has_class(&doc, &"li".into(), "missing").unwrap());
        assert!(!has_class(&doc, &Selector::None, "item").unwrap());
    }

    #[test]
    fn test_remove_and_plural_forms() {
        let mut doc = fixture();
        add_classes(&mut doc, &"li".into(), &["a", "b"]).unwrap();
        remove_classes(&mut doc, &"li".into(), &["item", "a"]).unwrap();

        assert_eq!(
            attr(&doc, &"li".into(), "class").unwrap().unwrap(),
            vec![Some("b".to_string()), Some("active b".to_string())]
        );

        remove_class(&mut doc, &"li".into(), "b").unwrap();
        remove_class(&mut doc, &"li".into(), "active").unwrap();
        assert_eq!(
            attr(&doc, &"li".into(), "class").unwrap().unwrap(),
            vec![None, None]
        );
    }
}
