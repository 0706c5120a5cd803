//! Ordered, last-write-wins capability collections.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityName;

/// An ordered collection of distinct capability names.
///
/// Re-inserting a name removes its previous occurrence and appends it at the
/// end, so the latest insertion determines position:
///
/// ```
/// use permflow_core::RequestSet;
///
/// let set = RequestSet::from_iter(["a", "b", "a"]);
/// assert_eq!(set.iter().map(|n| n.as_str()).collect::<Vec<_>>(), ["b", "a"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CapabilityName>", into = "Vec<CapabilityName>")]
pub struct RequestSet {
    names: Vec<CapabilityName>,
}

impl RequestSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name`, moving it to the end if already present.
    pub fn insert(&mut self, name: impl Into<CapabilityName>) {
        let name = name.into();
        self.remove(name.as_str());
        self.names.push(name);
    }

    /// Inserts `name` directly before `anchor`, moving it if already present.
    ///
    /// Appends when `anchor` is not in the set.
    pub fn insert_before(&mut self, name: impl Into<CapabilityName>, anchor: &str) {
        let name = name.into();
        if name.as_str() == anchor {
            return;
        }
        self.remove(name.as_str());
        match self.position(anchor) {
            Some(at) => self.names.insert(at, name),
            None => self.names.push(name),
        }
    }

    /// Removes `name`, returning whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(at) => {
                self.names.remove(at);
                true
            },
            None => false,
        }
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_str() == name)
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in order.
    #[must_use]
    pub fn as_slice(&self) -> &[CapabilityName] {
        &self.names
    }

    /// Iterates names in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CapabilityName> {
        self.names.iter()
    }

    /// Consumes the set, returning names in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<CapabilityName> {
        self.names
    }
}

impl<N: Into<CapabilityName>> FromIterator<N> for RequestSet {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<N: Into<CapabilityName>> Extend<N> for RequestSet {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl From<Vec<CapabilityName>> for RequestSet {
    fn from(names: Vec<CapabilityName>) -> Self {
        names.into_iter().collect()
    }
}

impl From<RequestSet> for Vec<CapabilityName> {
    fn from(set: RequestSet) -> Self {
        set.names
    }
}

impl IntoIterator for RequestSet {
    type Item = CapabilityName;
    type IntoIter = std::vec::IntoIter<CapabilityName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequestSet {
    type Item = &'a CapabilityName;
    type IntoIter = std::slice::Iter<'a, CapabilityName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
