//! Selector normalization and bulk dispatch.
//!
//! Every public operation in this crate goes through the same two steps:
//! [`find`] turns a polymorphic [`Selector`] into one uniform ordered
//! sequence of node handles (or the Absent marker), and the `each` family
//! applies a per-element action over that sequence in order. The `Selector`
//! union is built once at the API boundary, so nothing downstream ever asks
//! "is this a single element or a collection?" again.

use dom::{Document, NodeId, Result, SelectorList};

/// The polymorphic target of an operation.
///
/// `None` is the designed "do nothing" input, distinct from a query that
/// matches zero elements. `Query` holds a selector expression evaluated
/// against the document at dispatch time; `One`/`Many` pass node handles
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    None,
    One(NodeId),
    Many(Vec<NodeId>),
    Query(String),
}

impl Selector {
    pub fn query(expr: impl Into<String>) -> Self {
        Selector::Query(expr.into())
    }
}

impl From<&str> for Selector {
    fn from(expr: &str) -> Self {
        Selector::Query(expr.to_string())
    }
}

impl From<String> for Selector {
    fn from(expr: String) -> Self {
        Selector::Query(expr)
    }
}

impl From<NodeId> for Selector {
    fn from(id: NodeId) -> Self {
        Selector::One(id)
    }
}

impl From<Vec<NodeId>> for Selector {
    fn from(ids: Vec<NodeId>) -> Self {
        Selector::Many(ids)
    }
}

impl From<&[NodeId]> for Selector {
    fn from(ids: &[NodeId]) -> Self {
        Selector::Many(ids.to_vec())
    }
}

impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Selector::None,
        }
    }
}

/// Normalize a selector against a document.
///
/// Returns `Ok(None)` for the Absent selector, otherwise the ordered target
/// sequence: query matches in document order, pass-through sequences in
/// caller order. Normalization is deterministic for a fixed document state.
/// A malformed query expression surfaces the selector engine's error
/// unmodified.
pub fn find(doc: &Document, selector: &Selector) -> Result<Option<Vec<NodeId>>> {
    match selector {
        Selector::None => Ok(None),
        Selector::One(id) => Ok(Some(vec![*id])),
        Selector::Many(ids) => Ok(Some(ids.clone())),
        Selector::Query(expr) => {
            let parsed = SelectorList::parse(expr)?;
            let hits = doc.query(&parsed);
            tracing::debug!("find {:?}: {} elements", expr, hits.len());
            Ok(Some(hits))
        }
    }
}

/// Run an infallible action over every matched element, in sequence order,
/// with the zero-based position. Returns immediately with no effect on the
/// Absent selector.
pub fn each<F>(doc: &Document, selector: &Selector, mut action: F) -> Result<()>
where
    F: FnMut(NodeId, usize),
{
    if let Some(ids) = find(doc, selector)? {
        for (index, id) in ids.iter().enumerate() {
            action(*id, index);
        }
    }
    Ok(())
}

/// Like [`each`], but the action may fail; an error on element *i* aborts
/// elements *i+1..n* and propagates. There is no isolation between
/// elements — actions wanting best-effort behavior handle their own errors.
pub fn try_each<F>(doc: &Document, selector: &Selector, mut action: F) -> Result<()>
where
    F: FnMut(NodeId, usize) -> Result<()>,
{
    if let Some(ids) = find(doc, selector)? {
        for (index, id) in ids.iter().enumerate() {
            action(*id, index)?;
        }
    }
    Ok(())
}

/// The mutating dispatcher: normalizes first, then threads `&mut Document`
/// through the action. Same ordering and abort semantics as [`try_each`].
pub fn each_mut<F>(doc: &mut Document, selector: &Selector, mut action: F) -> Result<()>
where
    F: FnMut(&mut Document, NodeId, usize) -> Result<()>,
{
    if let Some(ids) = find(doc, selector)? {
        for (index, id) in ids.iter().enumerate() {
            action(doc, *id, index)?;
        }
    }
    Ok(())
}

/// First matched element, if any.
pub fn first(doc: &Document, selector: &Selector) -> Result<Option<NodeId>> {
    Ok(find(doc, selector)?.and_then(|ids| ids.first().copied()))
}

/// Whether any matched element matches the given selector expression.
pub fn is(doc: &Document, selector: &Selector, expr: &str) -> Result<bool> {
    let parsed = SelectorList::parse(expr)?;
    let mut truth = false;
    each(doc, selector, |id, _| {
        if doc.matches(id, &parsed) {
            truth = true;
        }
    })?;
    Ok(truth)
}

/// Identity-based de-duplication, first occurrence wins, order preserved.
pub fn uniques(ids: Vec<NodeId>) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::DomError;

    fn fixture() -> Document {
        Document::from_json(&serde_json::json!({
            "tag": "body",
            "children": [
                { "tag": "p", "attrs": { "class": "note" }, "children": ["alpha"] },
                { "tag": "p", "attrs": { "class": "note hot" }, "children": ["beta"] },
                { "tag": "span", "children": ["gamma"] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_conversions_build_the_right_variant() {
        assert_eq!(Selector::from("p.note"), Selector::Query("p.note".into()));
        assert_eq!(Selector::from(3 as NodeId), Selector::One(3));
        assert_eq!(Selector::from(vec![1, 2]), Selector::Many(vec![1, 2]));
        assert_eq!(Selector::from(&[4, 5][..]), Selector::Many(vec![4, 5]));
        assert_eq!(Selector::from(None::<&str>), Selector::None);
        assert_eq!(
            Selector::from(Some("div")),
            Selector::Query("div".into())
        );
    }

    #[test]
    fn test_find_absent_vs_empty() {
        let doc = fixture();
        assert_eq!(find(&doc, &Selector::None).unwrap(), None);
        // Zero matches is an empty sequence, not Absent.
        assert_eq!(find(&doc, &"table".into()).unwrap(), Some(vec![]));
    }

    #[test]
    fn test_find_passthrough_and_order() {
        let doc = fixture();
        let notes = find(&doc, &"p".into()).unwrap().unwrap();
        assert_eq!(notes.len(), 2);

        // Pass-through keeps caller order, even out of document order.
        let reversed: Vec<NodeId> = notes.iter().rev().copied().collect();
        assert_eq!(
            find(&doc, &reversed.clone().into()).unwrap().unwrap(),
            reversed
        );

        // Same input twice, same document: same result.
        assert_eq!(
            find(&doc, &"p.note".into()).unwrap(),
            find(&doc, &"p.note".into()).unwrap()
        );
    }

    #[test]
    fn test_find_bad_query_propagates() {
        let doc = fixture();
        assert!(matches!(
            find(&doc, &"p..x".into()),
            Err(DomError::SelectorParse { .. })
        ));
    }

    #[test]
    fn test_each_visits_in_order_with_indices() {
        let doc = fixture();
        let ids = find(&doc, &"p, span".into()).unwrap().unwrap();
        let mut seen = Vec::new();
        each(&doc, &ids.clone().into(), |id, i| seen.push((id, i))).unwrap();
        assert_eq!(
            seen,
            ids.iter().copied().enumerate().map(|(i, id)| (id, i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_try_each_aborts_on_error() {
        let doc = fixture();
        let mut visited = 0;
        let err = try_each(&doc, &"p, span".into(), |_, i| {
            visited += 1;
            if i == 1 {
                Err(DomError::NodeNotFound(999))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, DomError::NodeNotFound(999)));
        // Element 2 was never visited.
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_each_absent_is_a_no_op() {
        let doc = fixture();
        let mut called = false;
        each(&doc, &Selector::None, |_, _| called = true).unwrap();
        assert!(!called);
    }

    #[test]
    fn test_first_and_is() {
        let doc = fixture();
        let all_p = find(&doc, &"p".into()).unwrap().unwrap();
        assert_eq!(first(&doc, &"p".into()).unwrap(), Some(all_p[0]));
        assert_eq!(first(&doc, &"table".into()).unwrap(), None);
        assert_eq!(first(&doc, &Selector::None).unwrap(), None);

        assert!(is(&doc, &"p".into(), ".hot").unwrap());
        assert!(!is(&doc, &"span".into(), ".hot").unwrap());
        assert!(!is(&doc, &Selector::None, ".hot").unwrap());
    }

    #[test]
    fn test_uniques_keeps_first_occurrence() {
        assert_eq!(uniques(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert_eq!(uniques(vec![]), Vec::<NodeId>::new());
    }
}
