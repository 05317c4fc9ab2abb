//! Replicated types shared by the E2E tests

use syncnet_client::SynchronizerClient;
use syncnet_shared::{FieldCell, Property, Replicate, SyncedObject, TypeTag};

/// A 2D position. Field 0 is `x`, field 1 is `y`.
#[derive(PartialEq, Debug)]
pub struct Coordinate {
    base: SyncedObject,
    pub x: Property<f32>,
    pub y: Property<f32>,
}

impl Coordinate {
    pub const TYPE_TAG: TypeTag = TypeTag::new(1);

    pub fn new(x: f32, y: f32) -> Self {
        let base = SyncedObject::new();
        let x = Property::new(&base, x);
        let y = Property::new(&base, y);
        Self { base, x, y }
    }
}

// Copies values only: the copy gets its own SyncedObject and is unbound
impl Clone for Coordinate {
    fn clone(&self) -> Self {
        Self::new(*self.x, *self.y)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::new(300.0, 200.0)
    }
}

impl Replicate for Coordinate {
    fn type_tag(&self) -> TypeTag {
        Self::TYPE_TAG
    }

    fn synced_object(&self) -> &SyncedObject {
        &self.base
    }

    fn synced_object_mut(&mut self) -> &mut SyncedObject {
        &mut self.base
    }

    fn fields(&self) -> Vec<&dyn FieldCell> {
        vec![&self.x, &self.y]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FieldCell> {
        vec![&mut self.x, &mut self.y]
    }
}

/// A type mixing several scalar kinds
#[derive(PartialEq, Debug)]
pub struct Marker {
    base: SyncedObject,
    pub visible: Property<bool>,
    pub score: Property<u32>,
    pub offset: Property<i64>,
}

impl Marker {
    pub const TYPE_TAG: TypeTag = TypeTag::new(2);

    pub fn new(visible: bool, score: u32, offset: i64) -> Self {
        let base = SyncedObject::new();
        let visible = Property::new(&base, visible);
        let score = Property::new(&base, score);
        let offset = Property::new(&base, offset);
        Self {
            base,
            visible,
            score,
            offset,
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(false, 0, 0)
    }
}

impl Replicate for Marker {
    fn type_tag(&self) -> TypeTag {
        Self::TYPE_TAG
    }

    fn synced_object(&self) -> &SyncedObject {
        &self.base
    }

    fn synced_object_mut(&mut self) -> &mut SyncedObject {
        &mut self.base
    }

    fn fields(&self) -> Vec<&dyn FieldCell> {
        vec![&self.visible, &self.score, &self.offset]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FieldCell> {
        vec![&mut self.visible, &mut self.score, &mut self.offset]
    }
}

/// Registers default factories and dropping destructors for every test type
pub fn register_test_types(client: &mut SynchronizerClient) {
    client.set_lifetime_managers(Coordinate::TYPE_TAG, |_| Coordinate::default(), drop);
    client.set_lifetime_managers(Marker::TYPE_TAG, |_| Marker::default(), drop);
}
