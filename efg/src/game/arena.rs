/// Generational storage for tree entities. A slot's generation is bumped when
/// its value is removed, so keys handed out before the removal stop resolving.
#[derive(Debug, Clone)]
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free: Vec<u32>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    generation: u32,
    value: Option<V>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Key {
    index: u32,
    generation: u32,
}

impl<V> Arena<V> {
    pub fn new() -> Arena<V> {
        Arena {
            slots: vec![],
            free: vec![],
            len: 0,
        }
    }

    pub fn insert(&mut self, value: V) -> Key {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.value.is_none());
                slot.value = Some(value);
                Key {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                Key {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    pub fn remove(&mut self, key: Key) -> Option<V> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation || slot.value.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        slot.value.take()
    }

    pub fn get(&self, key: Key) -> Option<&V> {
        match self.slots.get(key.index as usize) {
            Some(slot) if slot.generation == key.generation => slot.value.as_ref(),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        match self.slots.get_mut(key.index as usize) {
            Some(slot) if slot.generation == key.generation => slot.value.as_mut(),
            _ => None,
        }
    }

    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<V> std::ops::Index<Key> for Arena<V> {
    type Output = V;

    fn index(&self, key: Key) -> &V {
        self.get(key).expect("stale arena key used internally")
    }
}

impl<V> std::ops::IndexMut<Key> for Arena<V> {
    fn index_mut(&mut self, key: Key) -> &mut V {
        self.get_mut(key).expect("stale arena key used internally")
    }
}
