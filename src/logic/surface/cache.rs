//! Surface Cache - capacity-bounded LRU memo for risk surfaces
//!
//! Keyed by (feature_x, feature_y, steps, model version). A new model file
//! timestamp is a new key, so stale surfaces simply age out. The lock is
//! never held while computing; concurrent misses on one key may both compute.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::grid::{compute_surface, Surface, SweepSpec};
use crate::logic::features::FeatureRow;
use crate::logic::model::{Classifier, ModelError, ModelVersion};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceKey {
    pub feature_x: &'static str,
    pub feature_y: &'static str,
    pub steps: usize,
    pub version: ModelVersion,
}

impl SurfaceKey {
    pub fn new(spec: &SweepSpec, version: ModelVersion) -> Self {
        Self {
            feature_x: spec.x.name,
            feature_y: spec.y.name,
            steps: spec.steps,
            version,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Slot {
    surface: Arc<Surface>,
    last_used: u64,
}

#[derive(Default)]
struct LruTable {
    slots: HashMap<SurfaceKey, Slot>,
    tick: u64,
    stats: CacheStats,
}

impl LruTable {
    fn touch(&mut self, key: &SurfaceKey) -> Option<Arc<Surface>> {
        self.tick += 1;
        let tick = self.tick;
        let slot = self.slots.get_mut(key)?;
        slot.last_used = tick;
        Some(slot.surface.clone())
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.slots.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

pub struct SurfaceCache {
    capacity: usize,
    baseline: FeatureRow,
    table: Mutex<LruTable>,
}

impl SurfaceCache {
    pub fn new(capacity: usize, baseline: FeatureRow) -> Self {
        Self {
            capacity,
            baseline,
            table: Mutex::new(LruTable::default()),
        }
    }

    /// Cached surface for this sweep and model version, computing on a miss
    pub fn get_or_compute(
        &self,
        model: &dyn Classifier,
        spec: &SweepSpec,
        version: ModelVersion,
    ) -> Result<Arc<Surface>, ModelError> {
        let key = SurfaceKey::new(spec, version);

        {
            let mut table = self.table.lock();
            if let Some(surface) = table.touch(&key) {
                table.stats.hits += 1;
                tracing::debug!("Surface cache hit: {} x {} ({} steps)", key.feature_x, key.feature_y, key.steps);
                return Ok(surface);
            }
            table.stats.misses += 1;
        }

        tracing::debug!("Surface cache miss: {} x {} ({} steps)", key.feature_x, key.feature_y, key.steps);
        let surface = Arc::new(compute_surface(model, &self.baseline, spec)?);

        if self.capacity == 0 {
            return Ok(surface);
        }

        let mut table = self.table.lock();
        table.tick += 1;
        let tick = table.tick;
        table.slots.insert(key, Slot { surface: surface.clone(), last_used: tick });
        while table.slots.len() > self.capacity {
            table.evict_lru();
        }
        Ok(surface)
    }

    pub fn stats(&self) -> CacheStats {
        let table = self.table.lock();
        CacheStats {
            entries: table.slots.len(),
            ..table.stats
        }
    }
}
