//! Separate-chaining hash index keyed by record identifier.
//!
//! # Invariants
//! - Exactly one entry per live key; `len` equals the number of live keys.
//! - Capacity doubles when `len / capacity` exceeds the load factor,
//!   checked before each insertion.
//! - All entries are re-bucketed through the configured hash function on resize.

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

pub type KeyHasher<K> = Box<dyn Fn(&K) -> u32 + Send + Sync>;
pub type KeyEquality<K> = Box<dyn Fn(&K, &K) -> bool + Send + Sync>;

/// Folds a string into a 32-bit hash via `h = h * 31 + unit` over its
/// UTF-16 code units, returning the absolute value.
pub fn fold_hash(key: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in key.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

pub struct HashIndex<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    load_factor: f64,
    hasher: KeyHasher<K>,
    key_eq: KeyEquality<K>,
}

impl<K, V> HashIndex<K, V>
where
    K: AsRef<str> + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_capacity(capacity: usize, load_factor: f64) -> Self {
        Self::with_hasher(capacity, load_factor, Box::new(|key: &K| fold_hash(key.as_ref())))
    }
}

impl<K, V> Default for HashIndex<K, V>
where
    K: AsRef<str> + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashIndex<K, V>
where
    K: PartialEq + 'static,
{
    /// Builds an index with a caller-supplied hash function.
    ///
    /// A zero capacity is raised to one; a non-positive or non-finite load
    /// factor falls back to [`DEFAULT_LOAD_FACTOR`].
    pub fn with_hasher(capacity: usize, load_factor: f64, hasher: KeyHasher<K>) -> Self {
        let load_factor = if load_factor.is_finite() && load_factor > 0.0 {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };
        Self {
            buckets: empty_buckets(capacity.max(1)),
            len: 0,
            load_factor,
            hasher,
            key_eq: Box::new(|a: &K, b: &K| a == b),
        }
    }
}

impl<K, V> HashIndex<K, V> {
    /// Replaces structural key equality.
    ///
    /// The predicate must agree with the hash function: equal keys must hash
    /// to the same bucket.
    pub fn set_key_equality(&mut self, key_eq: KeyEquality<K>) {
        self.key_eq = key_eq;
    }

    /// Inserts or overwrites, returning the previous value for `key`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.exceeds_load_factor() {
            self.resize(self.capacity() * 2);
        }

        let index = self.bucket_index(&key);
        let key_eq = &self.key_eq;
        let bucket = &mut self.buckets[index];
        if let Some(entry) = bucket.iter_mut().find(|(existing, _)| key_eq(existing, &key)) {
            return Some(std::mem::replace(&mut entry.1, value));
        }

        bucket.push((key, value));
        self.len += 1;
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter()
            .find(|(existing, _)| (self.key_eq)(existing, key))
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let key_eq = &self.key_eq;
        self.buckets[index]
            .iter_mut()
            .find(|(existing, _)| key_eq(existing, key))
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let key_eq = &self.key_eq;
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|(existing, _)| key_eq(existing, key))?;
        let (_, value) = bucket.remove(position);
        self.len -= 1;
        Some(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Drops all entries but keeps the current capacity.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
    }

    /// Entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(key, value)| (key, value)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Current `len / capacity` ratio.
    pub fn current_load(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Re-buckets every entry at the current capacity.
    pub fn rehash(&mut self) {
        self.resize(self.capacity());
    }

    /// Per-bucket chain lengths, for distribution diagnostics.
    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    pub fn compute_hash(&self, key: &K) -> u32 {
        (self.hasher)(key)
    }

    fn exceeds_load_factor(&self) -> bool {
        self.current_load() > self.load_factor
    }

    fn bucket_index(&self, key: &K) -> usize {
        (self.hasher)(key) as usize % self.capacity()
    }

    fn resize(&mut self, new_capacity: usize) {
        let old_buckets = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity.max(1)));
        for (key, value) in old_buckets.into_iter().flatten() {
            let index = self.bucket_index(&key);
            self.buckets[index].push((key, value));
        }
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Vec<(K, V)>> {
    (0..capacity).map(|_| Vec::new()).collect()
}
