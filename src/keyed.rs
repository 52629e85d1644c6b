use std::marker::PhantomData;

use crate::{ShoreError, ShoreResult};

/// Positional and key-based access to one keyed collection of a node.
pub trait KeyedSource<'a>: Copy {
    type Value;

    fn len(&self) -> usize;
    fn key_at(&self, index: usize) -> Option<&'a str>;
    fn value_at(&self, index: usize) -> Option<Self::Value>;
    fn value_of(&self, key: &str) -> Option<Self::Value>;
}

/// Ordered, read-only mapping over engine-owned key/value pairs.
///
/// Infos, markers, attributes, ratings and parts are all exposed through
/// this type; only the [`KeyedSource`] differs.
#[derive(Clone, Copy)]
pub struct Keyed<'a, S> {
    source: S,
    _node: PhantomData<&'a ()>,
}

impl<'a, S: KeyedSource<'a>> Keyed<'a, S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            _node: PhantomData,
        }
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Key of the entry at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the end, `UnreadableEntry` when the engine
    /// cannot provide an in-range key.
    pub fn key_at(&self, index: usize) -> ShoreResult<&'a str> {
        self.check_index(index)?;
        self.source.key_at(index).ok_or(ShoreError::UnreadableEntry {
            index,
            count: self.count(),
        })
    }

    /// Value of the entry at `index`. Fails like [`Keyed::key_at`].
    pub fn value_at(&self, index: usize) -> ShoreResult<S::Value> {
        self.check_index(index)?;
        self.source.value_at(index).ok_or(ShoreError::UnreadableEntry {
            index,
            count: self.count(),
        })
    }

    /// Value stored under `key`.
    pub fn value_of(&self, key: &str) -> ShoreResult<S::Value> {
        self.get(key)
            .ok_or_else(|| ShoreError::KeyNotFound(key.to_string()))
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<S::Value> {
        self.source.value_of(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in engine order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a
    where
        S: 'a,
    {
        self.iter().map(|(key, _)| key)
    }

    /// Entries in engine order. Unreadable entries are skipped with a
    /// warning; use [`Keyed::key_at`] to observe them as errors.
    pub fn iter(&self) -> KeyedIter<'a, S> {
        KeyedIter {
            source: self.source,
            index: 0,
            _node: PhantomData,
        }
    }

    fn check_index(&self, index: usize) -> ShoreResult<()> {
        let count = self.count();
        if index >= count {
            return Err(ShoreError::IndexOutOfRange { index, count });
        }
        Ok(())
    }
}

impl<'a, S: KeyedSource<'a>> IntoIterator for Keyed<'a, S> {
    type Item = (&'a str, S::Value);
    type IntoIter = KeyedIter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the `(key, value)` entries of a [`Keyed`] collection.
pub struct KeyedIter<'a, S> {
    source: S,
    index: usize,
    _node: PhantomData<&'a ()>,
}

impl<'a, S: KeyedSource<'a>> Iterator for KeyedIter<'a, S> {
    type Item = (&'a str, S::Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.source.len() {
            let index = self.index;
            self.index += 1;
            match (self.source.key_at(index), self.source.value_at(index)) {
                (Some(key), Some(value)) => return Some((key, value)),
                _ => log::warn!(
                    "Skipping unreadable entry {} of {}",
                    index,
                    self.source.len()
                ),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.source.len().saturating_sub(self.index)))
    }
}
