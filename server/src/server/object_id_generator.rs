use syncnet_shared::ObjectId;

/// Hands out object ids counting up from 1. On wrap-around the counter skips
/// 0 and any id the caller reports as still taken.
pub struct ObjectIdGenerator {
    next: u32,
}

impl ObjectIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns `None` only if every id is taken
    pub fn generate(&mut self, is_taken: impl Fn(&ObjectId) -> bool) -> Option<ObjectId> {
        for _ in 0..=u32::MAX {
            let candidate = self.next;
            self.next = self.next.wrapping_add(1);
            if candidate == 0 {
                continue;
            }
            let object_id = ObjectId::new(candidate);
            if !is_taken(&object_id) {
                return Some(object_id);
            }
        }
        None
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
