use std::fmt::{self, Display};

use crate::{
    keyed::{Keyed, KeyedSource},
    native::{ContentNode, ObjectNode},
    Marker, Region, ShoreError, ShoreResult,
};

const UNREADABLE: &str = "<unreadable>";

/// Result graph of one processed frame.
///
/// A non-owning view: it borrows the engine that produced it, so it cannot
/// outlive the engine nor survive the next processing call.
#[derive(Clone, Copy)]
pub struct Content<'a> {
    node: &'a dyn ContentNode,
}

impl<'a> Content<'a> {
    pub(crate) fn new(node: &'a dyn ContentNode) -> Self {
        Self { node }
    }

    pub fn object_count(&self) -> usize {
        self.node.object_count()
    }

    /// Object at `index`.
    ///
    /// # Errors
    ///
    /// `ShoreError::IndexOutOfRange` when `index >= object_count()`.
    pub fn object(&self, index: usize) -> ShoreResult<Object<'a>> {
        let count = self.object_count();
        if index >= count {
            return Err(ShoreError::IndexOutOfRange { index, count });
        }
        self.node
            .object(index)
            .map(Object::new)
            .ok_or(ShoreError::UnreadableEntry { index, count })
    }

    /// Objects in engine order.
    pub fn objects(&self) -> impl Iterator<Item = Object<'a>> + 'a {
        let node = self.node;
        (0..node.object_count()).filter_map(move |index| node.object(index).map(Object::new))
    }

    pub fn info_count(&self) -> usize {
        self.node.info_count()
    }

    /// Frame-level key/value infos, e.g. `FrameRate`.
    pub fn infos(&self) -> Keyed<'a, Infos<'a>> {
        Keyed::new(Infos(self.node))
    }

    pub fn info_of(&self, key: &str) -> ShoreResult<&'a str> {
        self.infos().value_of(key)
    }
}

impl Display for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Content with {} object(s) and {} info(s)",
            self.object_count(),
            self.info_count()
        )
    }
}

impl fmt::Debug for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content")
            .field("objects", &self.object_count())
            .field("infos", &self.info_count())
            .finish()
    }
}

/// One detected object (or a part of one).
#[derive(Clone, Copy)]
pub struct Object<'a> {
    node: &'a dyn ObjectNode,
}

impl<'a> Object<'a> {
    pub(crate) fn new(node: &'a dyn ObjectNode) -> Self {
        Self { node }
    }

    /// Object type, e.g. `Face`.
    /// # Errors
    ///
    /// `InvalidString` when the engine's type name is missing or not UTF-8.
    pub fn object_type(&self) -> ShoreResult<&'a str> {
        self.node.object_type().ok_or_else(|| {
            ShoreError::InvalidString("object type is missing or not valid UTF-8".to_string())
        })
    }

    pub fn region(&self) -> Option<Region> {
        self.node.region()
    }

    pub fn markers(&self) -> Keyed<'a, Markers<'a>> {
        Keyed::new(Markers(self.node))
    }

    pub fn attributes(&self) -> Keyed<'a, Attributes<'a>> {
        Keyed::new(Attributes(self.node))
    }

    pub fn ratings(&self) -> Keyed<'a, Ratings<'a>> {
        Keyed::new(Ratings(self.node))
    }

    pub fn parts(&self) -> Keyed<'a, Parts<'a>> {
        Keyed::new(Parts(self.node))
    }

    pub fn marker_of(&self, key: &str) -> ShoreResult<Marker> {
        self.markers().value_of(key)
    }

    pub fn attribute_of(&self, key: &str) -> ShoreResult<&'a str> {
        self.attributes().value_of(key)
    }

    pub fn rating_of(&self, key: &str) -> ShoreResult<f32> {
        self.ratings().value_of(key)
    }

    pub fn part_of(&self, key: &str) -> ShoreResult<Object<'a>> {
        self.parts().value_of(key)
    }
}

/// `{}` prints the type line, `{:#}` the full description.
impl Display for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Object of type \"{}\"",
            self.object_type().unwrap_or(UNREADABLE)
        )?;
        if !f.alternate() {
            return Ok(());
        }

        match self.region() {
            Some(region) => write!(f, "\n- Region: {}", region)?,
            None => write!(f, "\n- Region: None")?,
        }
        write_section(f, "Markers", self.markers())?;
        write_section(f, "Attributes", self.attributes())?;
        write_section(f, "Ratings", self.ratings())?;
        write_section(f, "Parts", self.parts())
    }
}

fn write_section<'a, S>(f: &mut fmt::Formatter<'_>, title: &str, entries: Keyed<'a, S>) -> fmt::Result
where
    S: KeyedSource<'a>,
    S::Value: Display,
{
    if entries.is_empty() {
        return write!(f, "\n- {}: None", title);
    }
    write!(f, "\n- {}:", title)?;
    for (key, value) in entries {
        write!(f, "\n  * {}: {}", key, value)?;
    }
    Ok(())
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.object_type().unwrap_or(UNREADABLE))
            .field("region", &self.region())
            .field("markers", &self.markers().count())
            .field("attributes", &self.attributes().count())
            .field("ratings", &self.ratings().count())
            .field("parts", &self.parts().count())
            .finish()
    }
}

#[derive(Clone, Copy)]
pub struct Infos<'a>(&'a dyn ContentNode);

impl<'a> KeyedSource<'a> for Infos<'a> {
    type Value = &'a str;

    fn len(&self) -> usize {
        self.0.info_count()
    }

    fn key_at(&self, index: usize) -> Option<&'a str> {
        self.0.info_key(index)
    }

    fn value_at(&self, index: usize) -> Option<&'a str> {
        self.0.info(index)
    }

    fn value_of(&self, key: &str) -> Option<&'a str> {
        self.0.info_of(key)
    }
}

#[derive(Clone, Copy)]
pub struct Markers<'a>(&'a dyn ObjectNode);

impl<'a> KeyedSource<'a> for Markers<'a> {
    type Value = Marker;

    fn len(&self) -> usize {
        self.0.marker_count()
    }

    fn key_at(&self, index: usize) -> Option<&'a str> {
        self.0.marker_key(index)
    }

    fn value_at(&self, index: usize) -> Option<Marker> {
        self.0.marker(index)
    }

    fn value_of(&self, key: &str) -> Option<Marker> {
        self.0.marker_of(key)
    }
}

#[derive(Clone, Copy)]
pub struct Attributes<'a>(&'a dyn ObjectNode);

impl<'a> KeyedSource<'a> for Attributes<'a> {
    type Value = &'a str;

    fn len(&self) -> usize {
        self.0.attribute_count()
    }

    fn key_at(&self, index: usize) -> Option<&'a str> {
        self.0.attribute_key(index)
    }

    fn value_at(&self, index: usize) -> Option<&'a str> {
        self.0.attribute(index)
    }

    fn value_of(&self, key: &str) -> Option<&'a str> {
        self.0.attribute_of(key)
    }
}

#[derive(Clone, Copy)]
pub struct Ratings<'a>(&'a dyn ObjectNode);

impl<'a> KeyedSource<'a> for Ratings<'a> {
    type Value = f32;

    fn len(&self) -> usize {
        self.0.rating_count()
    }

    fn key_at(&self, index: usize) -> Option<&'a str> {
        self.0.rating_key(index)
    }

    fn value_at(&self, index: usize) -> Option<f32> {
        self.0.rating(index)
    }

    fn value_of(&self, key: &str) -> Option<f32> {
        self.0.rating_of(key)
    }
}

#[derive(Clone, Copy)]
pub struct Parts<'a>(&'a dyn ObjectNode);

impl<'a> KeyedSource<'a> for Parts<'a> {
    type Value = Object<'a>;

    fn len(&self) -> usize {
        self.0.part_count()
    }

    fn key_at(&self, index: usize) -> Option<&'a str> {
        self.0.part_key(index)
    }

    fn value_at(&self, index: usize) -> Option<Object<'a>> {
        self.0.part(index).map(Object::new)
    }

    fn value_of(&self, key: &str) -> Option<Object<'a>> {
        self.0.part_of(key).map(Object::new)
    }
}
