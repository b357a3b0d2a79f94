use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Slot storage with optional names. Freed slots are reused, so ids are stable only while an item lives.
#[derive(Debug)]
pub struct Storage<T> {
    data: Vec<Option<T>>,
    names: FxHashMap<String, usize>,
    free_ids: VecDeque<usize>,
}

impl<T> Storage<T> {
    pub fn store(&mut self, item: T) -> usize {
        let id = self.allocate_id();
        self.data[id] = Some(item);

        id
    }

    pub fn store_with_name(&mut self, name: &str, item: T) -> Result<usize> {
        if self.names.contains_key(name) {
            bail!("Storage item {} already exists", name);
        }

        let id = self.store(item);
        self.names.insert(name.to_string(), id);

        Ok(id)
    }

    pub fn contains_by_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn get(&self, id: usize) -> Result<&T> {
        self.data.get(id).and_then(|p| p.as_ref()).ok_or_else(|| anyhow!("Storage item {} not found", id))
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut T> {
        self.data.get_mut(id).and_then(|p| p.as_mut()).ok_or_else(|| anyhow!("Storage item {} not found", id))
    }

    pub fn get_by_name(&self, name: &str) -> Result<&T> {
        match self.names.get(name) {
            Some(id) => self.get(*id),
            None => bail!("Storage item {} not found", name),
        }
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Result<&mut T> {
        let id = *self.names.get(name).ok_or_else(|| anyhow!("Storage item {} not found", name))?;
        self.get_mut(id)
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<T> {
        let id = self.names.remove(name)?;
        let item = self.data[id].take();
        self.free_ids.push_back(id);

        item
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter().filter_map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.free_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate_id(&mut self) -> usize {
        if let Some(id) = self.free_ids.pop_front() {
            id
        } else {
            self.data.push(None);
            self.data.len() - 1
        }
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self { data: Vec::default(), names: FxHashMap::default(), free_ids: VecDeque::default() }
    }
}
