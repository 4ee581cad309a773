use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, ObjectResolver, Scene};

/// Resolves animation object ids to scene nodes, memoising the result.
///
/// The cache is tied to one scene instance and is dropped automatically when
/// a different model is passed in. Misses are cached too, so an id that does
/// not exist in the model is searched for (and reported) only once.
#[derive(Debug, Default)]
pub struct Binder {
    scene_id: Option<u32>,
    cache: FxHashMap<String, Option<NodeHandle>>,
}

impl Binder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, scene: &Scene, object_id: &str) -> Option<NodeHandle> {
        if self.scene_id != Some(scene.id) {
            self.cache.clear();
            self.scene_id = Some(scene.id);
        }

        if let Some(&cached) = self.cache.get(object_id) {
            match cached {
                Some(handle) if scene.get_node(handle).is_some() => return Some(handle),
                None => return None,
                // Node was removed since it was bound.
                Some(_) => {}
            }
        }

        let found = ObjectResolver::resolve(scene, scene.root(), object_id);
        if found.is_none() {
            log::warn!("Animation target `{object_id}` not found in model, skipping it");
        }
        self.cache.insert(object_id.to_owned(), found);
        found
    }

    /// Forgets every binding.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.scene_id = None;
    }

    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.cache.values().filter(|h| h.is_some()).count()
    }
}
