//! Parse cache keyed by template text.
//!
//! Users configure a handful of templates (filename, citekey, a few fields) and
//! render them over and over, so [`TemplateCache::new`] is an unbounded
//! insert-or-fetch map. A live preview that re-parses on every keystroke
//! should use [`TemplateCache::with_capacity`] instead: once full, the least
//! recently used template is evicted.
//!
//! Failed parses are not cached. The lock is only held for the lookup and the
//! insert, never while parsing or rendering.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::renderer::RenderOptions;
use crate::template::Template;
use crate::value::Value;

#[derive(Debug)]
struct Entry {
    template: Arc<Template>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    /// Monotonic use counter; higher means more recently used.
    clock: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn get(&mut self, source: &str) -> Option<Arc<Template>> {
        let now = self.tick();
        let entry = self.map.get_mut(source)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.template))
    }

    /// Insert unless another thread got there first; keep the first.
    fn insert(
        &mut self,
        source: &str,
        parsed: Arc<Template>,
        capacity: Option<usize>,
    ) -> Arc<Template> {
        if let Some(existing) = self.get(source) {
            return existing;
        }
        if let Some(capacity) = capacity {
            while self.map.len() >= capacity {
                self.evict_least_recent();
            }
        }
        let last_used = self.tick();
        self.map.insert(
            source.to_string(),
            Entry {
                template: Arc::clone(&parsed),
                last_used,
            },
        );
        parsed
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(source, _)| source.clone());
        if let Some(source) = oldest {
            tracing::trace!(source_len = source.len(), "template cache eviction");
            self.map.remove(&source);
        }
    }
}

/// Shared cache of parsed templates.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: Mutex<Entries>,
    /// `None` means unbounded.
    capacity: Option<usize>,
}

impl TemplateCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` templates (at least one), evicting
    /// the least recently used when full.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::default(),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Maximum number of entries, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Fetch the parsed form of `source`, parsing and inserting it on a miss.
    pub fn get_or_parse(&self, source: &str) -> Result<Arc<Template>> {
        if let Some(template) = self.entries.lock().get(source) {
            tracing::trace!(source_len = source.len(), "template cache hit");
            return Ok(template);
        }

        tracing::trace!(source_len = source.len(), "template cache miss");
        let parsed = Arc::new(Template::parse(source)?);
        Ok(self.entries.lock().insert(source, parsed, self.capacity))
    }

    /// Parse (or fetch) `source` and render it.
    pub fn render(&self, source: &str, context: &Value, options: &RenderOptions) -> Result<String> {
        let template = self.get_or_parse(source)?;
        Ok(template.render(context, options))
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map.is_empty()
    }

    /// Drop every cached template.
    pub fn clear(&self) {
        self.entries.lock().map.clear();
    }
}
