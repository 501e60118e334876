//! Pull-based single-pass cursors handed out as handles
//!
//! An iterator yields either plain values or whole objects (paths, clusters, mappings).
//! `next_*` peeks first, so asking for the wrong kind of item fails without consuming it.

use crate::containers::Element;
use crate::error::{illegal, GraphError, GraphResult};
use crate::handle::Object;
use std::fmt;
use std::iter::Peekable;

pub enum IterItem {
    Value(Element),
    // boxed, objects can themselves be iterators
    Object(Box<Object>),
}

impl From<Element> for IterItem {
    fn from(e: Element) -> Self {
        IterItem::Value(e)
    }
}

impl From<Object> for IterItem {
    fn from(o: Object) -> Self {
        IterItem::Object(Box::new(o))
    }
}

type BoxedItems = Box<dyn Iterator<Item = IterItem> + Send>;

pub struct HandleIter {
    inner: Peekable<BoxedItems>,
}

impl HandleIter {
    pub fn new<I>(items: I) -> Self
    where
        I: Iterator<Item = IterItem> + Send + 'static,
    {
        let boxed: BoxedItems = Box::new(items);
        HandleIter { inner: boxed.peekable() }
    }

    /// Iterate plain values
    pub fn values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Element>,
        I::IntoIter: Send + 'static,
    {
        Self::new(values.into_iter().map(IterItem::Value))
    }

    /// Iterate vertex or edge ids
    pub fn ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u64>,
        I::IntoIter: Send + 'static,
    {
        Self::new(ids.into_iter().map(|id| IterItem::Value(Element::id(id))))
    }

    pub fn objects<I>(objects: I) -> Self
    where
        I: IntoIterator<Item = Object>,
        I::IntoIter: Send + 'static,
    {
        Self::new(objects.into_iter().map(IterItem::from))
    }

    pub fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }

    fn next_value_with<T>(&mut self, read: impl FnOnce(&Element) -> GraphResult<T>) -> GraphResult<T> {
        let value = match self.inner.peek() {
            None => return Err(GraphError::IteratorExhausted),
            Some(IterItem::Object(obj)) => {
                return Err(illegal(format!("iterator yields a {}, not a value", obj.kind())))
            }
            Some(IterItem::Value(e)) => read(e)?,
        };
        self.inner.next();
        Ok(value)
    }

    pub fn next_element(&mut self) -> GraphResult<Element> {
        self.next_value_with(|e| Ok(e.clone()))
    }

    pub fn next_int(&mut self) -> GraphResult<i64> {
        self.next_value_with(Element::as_int)
    }

    pub fn next_double(&mut self) -> GraphResult<f64> {
        self.next_value_with(Element::as_double)
    }

    pub fn next_string(&mut self) -> GraphResult<String> {
        self.next_value_with(|e| e.as_str().map(str::to_string))
    }

    pub fn next_edge_pair(&mut self) -> GraphResult<(u64, u64)> {
        self.next_value_with(Element::as_edge_pair)
    }

    pub fn next_edge_triple(&mut self) -> GraphResult<(u64, u64, f64)> {
        self.next_value_with(Element::as_edge_triple)
    }

    pub fn next_object(&mut self) -> GraphResult<Object> {
        match self.inner.peek() {
            None => Err(GraphError::IteratorExhausted),
            Some(IterItem::Value(e)) => Err(illegal(format!("iterator yields {} values, not objects", e.kind()))),
            Some(IterItem::Object(_)) => match self.inner.next() {
                Some(IterItem::Object(obj)) => Ok(*obj),
                _ => Err(GraphError::Internal("iterator changed while peeked".to_string())),
            },
        }
    }
}

impl fmt::Debug for HandleIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleIter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::ElementList;

    #[test]
    fn test_values_in_order() {
        let mut it = HandleIter::ids(vec![3, 1, 2]);
        assert!(it.has_next());
        assert_eq!(it.next_int().unwrap(), 3);
        assert_eq!(it.next_int().unwrap(), 1);
        assert_eq!(it.next_int().unwrap(), 2);
        assert!(!it.has_next());
        assert_eq!(it.next_int(), Err(GraphError::IteratorExhausted));
    }

    #[test]
    fn test_wrong_kind_does_not_consume() {
        let mut it = HandleIter::values(vec![Element::Double(1.5)]);
        assert!(it.next_int().is_err());
        assert!(it.next_object().is_err());
        assert_eq!(it.next_double().unwrap(), 1.5);
    }

    #[test]
    fn test_objects() {
        let mut it = HandleIter::objects(vec![Object::List(ElementList::new())]);
        assert!(it.next_int().is_err());
        assert!(matches!(it.next_object(), Ok(Object::List(_))));
        assert!(matches!(it.next_object(), Err(GraphError::IteratorExhausted)));
    }

    #[test]
    fn test_edge_triples() {
        let mut it = HandleIter::values(vec![Element::EdgeTriple(0, 1, 2.5)]);
        assert_eq!(it.next_edge_triple().unwrap(), (0, 1, 2.5));
    }
}
