//! Keyed collections and group nodes.
//!
//! A [`KeyedCollection`] owns an ordered sequence of [`Entry`] values together
//! with its existence cache. Grouped views are modeled with [`GroupNode`]
//! entries whose children are collections in their own right, each with its
//! own cache.
//!
//! Entries can only be changed through the mutation operations of
//! [`KeyedStore`](crate::mutate::KeyedStore), which keeps the cache in step
//! with the records it describes.

use bson::Document;

use crate::cache::ExistenceCache;

/// A node of a grouped view.
///
/// `items` is preferred over `collapsed_items` when descending into a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    /// Fields of the group itself, typically its grouping key.
    pub fields: Document,
    /// Expanded children.
    pub items: Option<KeyedCollection>,
    /// Children of a collapsed group.
    pub collapsed_items: Option<KeyedCollection>,
}

impl GroupNode {
    /// Creates a group with expanded children.
    pub fn new(fields: Document, items: KeyedCollection) -> Self {
        Self { fields, items: Some(items), collapsed_items: None }
    }

    /// Creates a collapsed group.
    pub fn collapsed(fields: Document, collapsed_items: KeyedCollection) -> Self {
        Self { fields, items: None, collapsed_items: Some(collapsed_items) }
    }

    /// Returns the children to descend into: `items`, or `collapsed_items` when `items` is absent.
    pub fn children(&self) -> Option<&KeyedCollection> {
        self.items
            .as_ref()
            .or(self.collapsed_items.as_ref())
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut KeyedCollection> {
        match self.items {
            Some(ref mut items) => Some(items),
            None => self.collapsed_items.as_mut(),
        }
    }
}

/// An element of a keyed collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A plain record.
    Record(Document),
    /// A group node carrying nested collections.
    Group(GroupNode),
}

impl Entry {
    /// Returns the fields keys are extracted from.
    pub fn fields(&self) -> &Document {
        match self {
            Entry::Record(doc) => doc,
            Entry::Group(group) => &group.fields,
        }
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Document {
        match self {
            Entry::Record(doc) => doc,
            Entry::Group(group) => &mut group.fields,
        }
    }

    /// Returns the group node, if this entry is one.
    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Entry::Group(group) => Some(group),
            Entry::Record(_) => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut GroupNode> {
        match self {
            Entry::Group(group) => Some(group),
            Entry::Record(_) => None,
        }
    }
}

impl From<Document> for Entry {
    fn from(doc: Document) -> Self {
        Entry::Record(doc)
    }
}

impl From<GroupNode> for Entry {
    fn from(group: GroupNode) -> Self {
        Entry::Group(group)
    }
}


/// An ordered, mutable sequence of records with an attached existence cache.
///
/// Cloning a collection clones its cache with it.
///
/// # Example
///
/// ```ignore
/// use keyedstore::prelude::*;
/// use bson::doc;
///
/// let mut users = KeyedCollection::from_records([doc! { "id": 1, "name": "a" }]);
/// let store = KeyedStore::new(KeySpec::new(KeyExpr::single("id")));
///
/// store.insert(&mut users, doc! { "id": 2, "name": "b" }, None)?;
/// assert_eq!(users.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyedCollection {
    entries: Vec<Entry>,
    pub(crate) cache: Option<ExistenceCache>,
}

impl KeyedCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection of plain records.
    pub fn from_records(records: impl IntoIterator<Item = Document>) -> Self {
        Self::from_entries(
            records
                .into_iter()
                .map(Entry::Record)
        )
    }

    /// Creates a collection from entries, which may include group nodes.
    pub fn from_entries(entries: impl IntoIterator<Item = impl Into<Entry>>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .collect(),
            cache: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Returns all entries in order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterates over the fields of every entry in order.
    pub fn records(&self) -> impl Iterator<Item = &Document> {
        self.entries
            .iter()
            .map(Entry::fields)
    }

    /// Consumes the collection, returning its entries. The cache is dropped.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Returns `true` if an existence cache is attached.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Detaches the existence cache. The next keyed operation rebuilds it.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Inserts at `index`, or appends when `index` is `None` or past the end.
    /// Returns the position of the new entry.
    pub(crate) fn insert_entry(&mut self, entry: Entry, index: Option<usize>) -> usize {
        match index {
            Some(index) if index <= self.entries.len() => {
                self.entries.insert(index, entry);
                index
            },
            _ => {
                self.entries.push(entry);
                self.entries.len() - 1
            },
        }
    }

    pub(crate) fn remove_entry(&mut self, index: usize) -> Entry {
        self.entries.remove(index)
    }
}

/// Collections compare by their entries; caches are ignored.
impl PartialEq for KeyedCollection {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<Document> for KeyedCollection {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}
