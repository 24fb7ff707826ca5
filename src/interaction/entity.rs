//! Scene entity metadata and screen-space hit testing.
//!
//! Every touchable thing on the stage is registered once and carries an
//! [`EntityTag`] saying what it is. Touch dispatch never inspects the scene
//! graph; it resolves the touched entity here and reads its tag.

use cgmath::Vector2;

/// Opaque handle to a registered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

/// What a touched entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    /// Container of the model in slot `slot`.
    Model { slot: usize },
    /// Draggable light proxy.
    LightProxy,
    /// Anything else, including the root layer and unknown entities.
    Other,
}

/// Axis-aligned rectangle in stage pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub min: Vector2<f32>,
    pub max: Vector2<f32>,
}

impl ScreenRect {
    pub fn new(min: Vector2<f32>, max: Vector2<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Vector2<f32>, size: Vector2<f32>) -> Self {
        Self::new(origin, origin + size)
    }

    pub fn from_center_size(center: Vector2<f32>, size: Vector2<f32>) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn size(&self) -> Vector2<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector2<f32> {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vector2<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[derive(Debug, Clone, Copy)]
struct EntityEntry {
    tag: EntityTag,
    /// `None` covers the whole stage.
    bounds: Option<ScreenRect>,
    visible: bool,
}

/// Registry of touchable entities, in back-to-front order.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: Vec<EntityEntry>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity on top of everything registered before it.
    pub fn register(&mut self, tag: EntityTag, bounds: Option<ScreenRect>) -> EntityId {
        self.entries.push(EntityEntry {
            tag,
            bounds,
            visible: true,
        });
        EntityId((self.entries.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tag of `id`; unknown ids read as [`EntityTag::Other`].
    pub fn tag(&self, id: EntityId) -> EntityTag {
        self.entries
            .get(id.0 as usize)
            .map_or(EntityTag::Other, |entry| entry.tag)
    }

    pub fn bounds(&self, id: EntityId) -> Option<ScreenRect> {
        self.entries.get(id.0 as usize).and_then(|entry| entry.bounds)
    }

    pub fn set_bounds(&mut self, id: EntityId, bounds: ScreenRect) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.bounds = Some(bounds);
        }
    }

    pub fn is_visible(&self, id: EntityId) -> bool {
        self.entries
            .get(id.0 as usize)
            .is_some_and(|entry| entry.visible)
    }

    /// Hidden entities cannot be hit.
    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.visible = visible;
        }
    }

    /// Topmost visible entity under `point`.
    pub fn hit_test(&self, point: Vector2<f32>) -> Option<EntityId> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| {
                entry.visible && entry.bounds.map_or(true, |bounds| bounds.contains(point))
            })
            .map(|(index, _)| EntityId(index as u32))
    }

    /// Tag of the topmost visible entity under `point`.
    pub fn classify(&self, point: Vector2<f32>) -> EntityTag {
        self.hit_test(point)
            .map_or(EntityTag::Other, |id| self.tag(id))
    }
}
