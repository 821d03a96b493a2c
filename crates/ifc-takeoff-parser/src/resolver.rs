// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EntityResolver trait implementation

use crate::scanner::EntityIndex;
use crate::tokenizer::parse_entity;
use ifc_takeoff_model::{DecodedEntity, EntityId, EntityResolver, GraphError, IfcType, Result};
use log::debug;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe, lazily decoding entity resolver
pub struct ResolverImpl {
    /// Raw STEP content (owned so the resolver can outlive the input buffer)
    content: String,
    /// Record index built by the scanner
    index: EntityIndex,
    /// Decoded entity cache
    cache: RwLock<FxHashMap<u32, Arc<DecodedEntity>>>,
}

impl ResolverImpl {
    /// Create a resolver, indexing `content` once
    pub fn new(content: String) -> Self {
        let index = EntityIndex::build(&content);
        Self {
            content,
            index,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Byte offset of a record, used to merge per-type ID lists in file order
    pub fn offset_of(&self, id: EntityId) -> Option<usize> {
        self.index.span(id).map(|(start, _)| start)
    }

    /// Number of decoded records currently cached
    pub fn cache_size(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Decode a record, reporting why it is unavailable
    pub fn try_get(&self, id: EntityId) -> Result<Arc<DecodedEntity>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(cached) = cache.get(&id.0) {
                return Ok(Arc::clone(cached));
            }
        }

        let (start, end) = self.index.span(id).ok_or(GraphError::EntityNotFound(id))?;
        let entity = parse_entity(&self.content[start..end])
            .map(Arc::new)
            .map_err(|reason| GraphError::entity_parse(id, reason))?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.0, Arc::clone(&entity));
        }

        Ok(entity)
    }
}

impl EntityResolver for ResolverImpl {
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.try_get(id).map_err(|e| debug!("{}", e)).ok()
    }

    fn ids_by_type(&self, ifc_type: &IfcType) -> &[EntityId] {
        self.index.ids_of(ifc_type)
    }

    fn entity_count(&self) -> usize {
        self.index.len()
    }
}
