use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::InvalidSequenceError;
use crate::core::sequence::Tag;
use crate::core::types::TagId;

/// A tag in a reference set together with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTag {
    pub name: String,
    pub tag: Tag,
}

/// A finite, deduplicated collection of reference tags.
///
/// Ids follow first-insertion order. A repeated sequence keeps the id and name
/// of its first occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ReferenceTag>", into = "Vec<ReferenceTag>")]
pub struct ReferenceSet {
    entries: Vec<ReferenceTag>,

    /// Index: sequence -> id
    tag_to_id: FxHashMap<Tag, TagId>,
}

impl ReferenceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from unnamed tags; names default to `tag<id>`
    #[must_use]
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut set = Self::new();
        for tag in tags {
            let name = format!("tag{}", set.len());
            set.insert(name, tag);
        }
        set
    }

    /// Build from raw sequence strings
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequenceError` for the first sequence with a symbol
    /// outside {A,C,G,T}.
    pub fn from_sequences<S: AsRef<[u8]>>(
        sequences: impl IntoIterator<Item = S>,
    ) -> Result<Self, InvalidSequenceError> {
        let tags = sequences
            .into_iter()
            .map(Tag::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_tags(tags))
    }

    /// Insert a named tag, returning its id. Duplicates return the existing id.
    pub fn insert(&mut self, name: impl Into<String>, tag: Tag) -> TagId {
        if let Some(&id) = self.tag_to_id.get(&tag) {
            return id;
        }
        #[allow(clippy::cast_possible_truncation)] // bounded by memory long before u32::MAX tags
        let id = TagId(self.entries.len() as u32);
        self.tag_to_id.insert(tag.clone(), id);
        self.entries.push(ReferenceTag {
            name: name.into(),
            tag,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: TagId) -> Option<&ReferenceTag> {
        self.entries.get(id.index())
    }

    #[must_use]
    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.get(id).map(|entry| &entry.tag)
    }

    #[must_use]
    pub fn id_of(&self, tag: &Tag) -> Option<TagId> {
        self.tag_to_id.get(tag).copied()
    }

    /// Iterate `(id, entry)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &ReferenceTag)> {
        self.entries.iter().enumerate().map(|(i, entry)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = TagId(i as u32);
            (id, entry)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ReferenceTag>> for ReferenceSet {
    fn from(entries: Vec<ReferenceTag>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry.name, entry.tag);
        }
        set
    }
}

impl From<ReferenceSet> for Vec<ReferenceTag> {
    fn from(set: ReferenceSet) -> Self {
        set.entries
    }
}

impl FromIterator<Tag> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}
