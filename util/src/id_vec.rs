use std::marker::PhantomData;

/// Vec wrapper that uses typed indexes.
///
/// Ids are handed out by [`IdVec::push`] and are only meaningful
/// for the `IdVec` that created them.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct IdVec<K, V> {
    vec: Vec<V>,
    _phantom: PhantomData<K>,
}

impl<K, V> Default for IdVec<K, V> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K, V> IdVec<K, V> {
    /// Create a new `IdVec` backed by the given vec.
    fn new(vec: Vec<V>) -> Self {
        Self {
            vec,
            _phantom: PhantomData,
        }
    }

    /// Create a new `IdVec` with the given capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self::new(Vec::with_capacity(cap))
    }

    /// Get the current length
    #[inline]
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// True if len == 0
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Iterate through immutable references to values
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vec.iter()
    }
}

impl<K: From<usize>, V> IdVec<K, V> {
    /// Iterate through values along with their ids, in insertion order.
    pub fn iter_ids(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.vec.iter().enumerate().map(|(i, v)| (i.into(), v))
    }

    /// Push `v` into the underlying vec, and return an id that can be used to retrieve it later.
    #[inline]
    pub fn push(&mut self, v: V) -> K {
        let id = self.vec.len().into();
        self.vec.push(v);
        id
    }
}

impl<K: Into<usize>, V> IdVec<K, V> {
    /// Get the value with id `k`.
    #[inline]
    pub fn get(&self, k: K) -> &V {
        &self.vec[k.into()]
    }

    /// Get a mutable reference to value with id `k`.
    #[inline]
    pub fn get_mut(&mut self, k: K) -> &mut V {
        &mut self.vec[k.into()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Id(usize);

    impl From<usize> for Id {
        fn from(val: usize) -> Self {
            Self(val)
        }
    }

    impl From<Id> for usize {
        fn from(id: Id) -> usize {
            id.0
        }
    }

    #[test]
    fn test_push_and_get() {
        let mut v: IdVec<Id, &str> = IdVec::with_capacity(2);
        let a = v.push("a");
        let b = v.push("b");
        assert_eq!(a, Id(0));
        assert_eq!(b, Id(1));
        assert_eq!(*v.get(b), "b");
        *v.get_mut(a) = "z";
        assert_eq!(*v.get(a), "z");
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_iter_ids() {
        let mut v: IdVec<Id, u8> = IdVec::default();
        assert!(v.is_empty());
        v.push(7);
        v.push(9);
        let pairs: Vec<(Id, u8)> = v.iter_ids().map(|(k, x)| (k, *x)).collect();
        assert_eq!(pairs, vec![(Id(0), 7), (Id(1), 9)]);
    }
}
