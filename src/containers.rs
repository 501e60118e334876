//! Generic value containers crossing the boundary
//!
//! Containers hold [`Element`]s: ints, doubles, strings, edge pairs or edge triples.
//! Lists are always insertion ordered. Sets and maps come in a linked variant that
//! keeps insertion order across removals, and a plain variant whose order is only
//! stable between mutations.

use crate::error::{illegal, GraphResult};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Int(i64),
    Double(f64),
    Str(String),
    /// (source, target)
    EdgePair(u64, u64),
    /// (source, target, weight)
    EdgeTriple(u64, u64, f64),
}

impl Element {
    /// A vertex or edge id; graphs never hold ids above `i64::MAX`
    pub fn id(id: u64) -> Self {
        Element::Int(id as i64)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Int(_) => "int",
            Element::Double(_) => "double",
            Element::Str(_) => "string",
            Element::EdgePair(..) => "edge pair",
            Element::EdgeTriple(..) => "edge triple",
        }
    }

    pub fn as_int(&self) -> GraphResult<i64> {
        match self {
            Element::Int(i) => Ok(*i),
            other => Err(illegal(format!("expected an int, found a {}", other.kind()))),
        }
    }

    /// Non-negative int interpreted as a vertex or edge id
    pub fn as_id(&self) -> GraphResult<u64> {
        let i = self.as_int()?;
        u64::try_from(i).map_err(|_| illegal(format!("{} is not a valid id", i)))
    }

    pub fn as_double(&self) -> GraphResult<f64> {
        match self {
            Element::Double(d) => Ok(*d),
            other => Err(illegal(format!("expected a double, found a {}", other.kind()))),
        }
    }

    pub fn as_str(&self) -> GraphResult<&str> {
        match self {
            Element::Str(s) => Ok(s),
            other => Err(illegal(format!("expected a string, found a {}", other.kind()))),
        }
    }

    /// Source and target of an edge pair or triple
    pub fn as_edge_pair(&self) -> GraphResult<(u64, u64)> {
        match self {
            Element::EdgePair(s, t) | Element::EdgeTriple(s, t, _) => Ok((*s, *t)),
            other => Err(illegal(format!("expected an edge pair, found a {}", other.kind()))),
        }
    }

    pub fn as_edge_triple(&self) -> GraphResult<(u64, u64, f64)> {
        match self {
            Element::EdgeTriple(s, t, w) => Ok((*s, *t, *w)),
            other => Err(illegal(format!("expected an edge triple, found a {}", other.kind()))),
        }
    }
}

// Doubles compare by bit pattern so that elements can live in hashed containers.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Int(a), Element::Int(b)) => a == b,
            (Element::Double(a), Element::Double(b)) => a.to_bits() == b.to_bits(),
            (Element::Str(a), Element::Str(b)) => a == b,
            (Element::EdgePair(a, b), Element::EdgePair(c, d)) => a == c && b == d,
            (Element::EdgeTriple(a, b, w), Element::EdgeTriple(c, d, x)) => {
                a == c && b == d && w.to_bits() == x.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Element::Int(i) => i.hash(state),
            Element::Double(d) => d.to_bits().hash(state),
            Element::Str(s) => s.hash(state),
            Element::EdgePair(s, t) => {
                s.hash(state);
                t.hash(state);
            }
            Element::EdgeTriple(s, t, w) => {
                s.hash(state);
                t.hash(state);
                w.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Int(i) => write!(f, "{}", i),
            Element::Double(d) => write!(f, "{}", d),
            Element::Str(s) => write!(f, "{:?}", s),
            Element::EdgePair(s, t) => write!(f, "({}, {})", s, t),
            Element::EdgeTriple(s, t, w) => write!(f, "({}, {}, {})", s, t, w),
        }
    }
}

impl From<i64> for Element {
    fn from(i: i64) -> Self {
        Element::Int(i)
    }
}

impl From<f64> for Element {
    fn from(d: f64) -> Self {
        Element::Double(d)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Str(s.to_string())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::Str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementList {
    items: Vec<Element>,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, e: Element) {
        self.items.push(e);
    }

    /// Remove the first occurrence; `false` when absent
    pub fn remove(&mut self, e: &Element) -> bool {
        match self.items.iter().position(|x| x == e) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, e: &Element) -> bool {
        self.items.contains(e)
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.items.iter()
    }
}

impl FromIterator<Element> for ElementList {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        ElementList {
            items: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSet {
    items: IndexSet<Element>,
    linked: bool,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iteration order equals insertion order, also after removals
    pub fn linked() -> Self {
        ElementSet {
            items: IndexSet::new(),
            linked: true,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// `false` when already present
    pub fn insert(&mut self, e: Element) -> bool {
        self.items.insert(e)
    }

    pub fn remove(&mut self, e: &Element) -> bool {
        if self.linked {
            self.items.shift_remove(e)
        } else {
            self.items.swap_remove(e)
        }
    }

    pub fn contains(&self, e: &Element) -> bool {
        self.items.contains(e)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.items.iter()
    }
}

impl FromIterator<Element> for ElementSet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        ElementSet {
            items: iter.into_iter().collect(),
            linked: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    entries: IndexMap<Element, Element>,
    linked: bool,
}

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linked() -> Self {
        ElementMap {
            entries: IndexMap::new(),
            linked: true,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Returns the previous value under `key`
    pub fn insert(&mut self, key: Element, value: Element) -> Option<Element> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &Element) -> Option<&Element> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &Element) -> Option<Element> {
        if self.linked {
            self.entries.shift_remove(key)
        } else {
            self.entries.swap_remove(key)
        }
    }

    pub fn contains_key(&self, key: &Element) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Element> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Element> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Element, &Element)> {
        self.entries.iter()
    }
}

impl FromIterator<(Element, Element)> for ElementMap {
    fn from_iter<I: IntoIterator<Item = (Element, Element)>>(iter: I) -> Self {
        ElementMap {
            entries: iter.into_iter().collect(),
            linked: false,
        }
    }
}
