// Defines an insertion-ordered map newtype over `IndexMap` with the
// `hashbrown` default hasher, so the crate does not depend on the
// `indexmap` std hasher. Both names must be in scope at the call site.
macro_rules! map {
    (
        $(#[$attrs:meta])*
        pub struct $name:ident($map:ident<$key:ty, $value:ty, $hasher:ident>);
    ) => {
        $(#[$attrs])*
        pub struct $name($map<$key, $value, $hasher>);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl IntoIterator for $name {
            type Item = ($key, $value);
            type IntoIter = indexmap::map::IntoIter<$key, $value>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = (&'a $key, &'a $value);
            type IntoIter = indexmap::map::Iter<'a, $key, $value>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl FromIterator<($key, $value)> for $name {
            fn from_iter<I: IntoIterator<Item = ($key, $value)>>(iter: I) -> Self {
                let mut map = Self::new();
                for (key, value) in iter {
                    map.add(key, value);
                }
                map
            }
        }

        impl $name {
            #[doc = concat!("Creates an empty [`", stringify!($name), "`].")]
            #[must_use]
            #[inline]
            pub fn new() -> Self {
                Self($map::with_hasher($hasher::default()))
            }

            /// Inserts an element, replacing any previous one with the
            /// same key.
            #[must_use]
            #[inline]
            pub fn insert(mut self, key: $key, value: $value) -> Self {
                self.add(key, value);
                self
            }

            /// Adds an element, replacing any previous one with the
            /// same key.
            #[inline]
            pub fn add(&mut self, key: $key, value: $value) {
                self.0.insert(key, value);
            }

            /// Removes the element associated with the given key.
            #[inline]
            pub fn remove(&mut self, key: &str) -> Option<$value> {
                self.0.shift_remove(key)
            }

            /// Retrieves the element associated with the given key.
            #[must_use]
            #[inline]
            pub fn get(&self, key: &str) -> Option<&$value> {
                self.0.get(key)
            }

            /// Checks whether the map contains the given key.
            #[must_use]
            #[inline]
            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            /// Checks whether the map is empty.
            #[must_use]
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the number of elements.
            #[must_use]
            #[inline]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Iterates over the elements in insertion order.
            #[inline]
            pub fn iter(&self) -> indexmap::map::Iter<'_, $key, $value> {
                self.0.iter()
            }
        }
    };
}

pub(crate) use map;
