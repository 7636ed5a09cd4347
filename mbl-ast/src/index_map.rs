use std::{
    marker::PhantomData,
    ops::{Index, IndexMut},
};
use ustr::{Ustr, UstrMap};

pub trait IndexMapKey {
    fn get(&self) -> usize;
    fn from_index(index: usize) -> Self;
}

/// Insertion-ordered storage addressable both by a typed index and by an interned key
pub struct UstrIndexMap<T, K: IndexMapKey> {
    storage: Vec<T>,
    map: UstrMap<usize>,
    phantom: PhantomData<K>,
}

impl<T, K> Default for UstrIndexMap<T, K>
where
    K: IndexMapKey,
{
    fn default() -> Self {
        UstrIndexMap::<T, K>::new()
    }
}

impl<T, K> UstrIndexMap<T, K>
where
    K: IndexMapKey,
{
    pub fn new() -> UstrIndexMap<T, K> {
        UstrIndexMap {
            storage: Vec::new(),
            map: Default::default(),
            phantom: PhantomData,
        }
    }

    /// Every key in insertion order
    pub fn ids(&self) -> impl Iterator<Item = K> {
        (0..self.storage.len()).map(K::from_index)
    }

    pub fn get(&self, key: &Ustr) -> Option<&T> {
        self.map.get(key).map(|id| &self.storage[*id])
    }

    pub fn get_id(&self, key: &Ustr) -> Option<K> {
        self.map.get(key).map(|id| K::from_index(*id))
    }

    pub fn contains_key(&self, key: &Ustr) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, key: Ustr, value: T) -> K {
        let id = self.storage.len();
        self.storage.push(value);
        self.map.insert(key, id);
        K::from_index(id)
    }
}

impl<T, K> Index<K> for UstrIndexMap<T, K>
where
    K: IndexMapKey,
{
    type Output = T;

    fn index(&self, index: K) -> &Self::Output {
        &self.storage[index.get()]
    }
}

impl<T, K> IndexMut<K> for UstrIndexMap<T, K>
where
    K: IndexMapKey,
{
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.storage[index.get()]
    }
}
