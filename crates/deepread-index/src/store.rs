use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use deepread_core::error::{Error, Result};
use deepread_core::traits::{DocumentStore, Documents};
use deepread_core::types::Document;

/// Process-lifetime document index.
///
/// Writers (`put`, `clear`) take the write lock, readers take the read lock
/// and leave with `Arc` handles, so a document being replaced is never seen
/// half-written. There is no eviction: memory grows with every distinct id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    docs: Vec<Arc<Document>>,
    by_id: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn shared() -> Arc<Self> { Arc::new(Self::new()) }

    fn read(&self) -> Result<RwLockReadGuard<'_, Slots>> {
        self.inner.read().map_err(|_| Error::Operation("document store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Slots>> {
        self.inner.write().map_err(|_| Error::Operation("document store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, document: Document) -> Result<()> {
        let mut slots = self.write()?;
        let doc = Arc::new(document);
        // Replacing keeps the original position, like an ordered map.
        match slots.by_id.get(&doc.id).copied() {
            Some(pos) => slots.docs[pos] = doc,
            None => {
                let pos = slots.docs.len();
                slots.by_id.insert(doc.id.clone(), pos);
                slots.docs.push(doc);
            }
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Arc<Document>> {
        let slots = self.read()?;
        slots
            .by_id
            .get(id)
            .map(|&pos| Arc::clone(&slots.docs[pos]))
            .ok_or_else(|| Error::NotFound(format!("document '{}'", id)))
    }

    fn all(&self) -> Result<Documents> {
        Ok(Documents::from(self.read()?.docs.clone()))
    }

    fn clear(&self) -> Result<()> {
        let mut slots = self.write()?;
        slots.docs.clear();
        slots.by_id.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read()?.docs.len())
    }
}
