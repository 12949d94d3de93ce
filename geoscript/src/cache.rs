/*
This file is part of the GeoScript Binding Layer
Copyright (C) 2022 Novel-T

The GeoScript Binding Layer is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use log::debug;

/// Memoizes values derived from a wrapper's engine handle, keyed by name.
///
/// A value is computed on first access and handed out as the same `Rc` after
/// that.  Nothing is ever evicted; a cloned wrapper starts with an empty cache.
#[derive(Default)]
pub struct LazyCache {
    cache: RefCell<HashMap<&'static str, Rc<dyn Any>>>,
}

impl LazyCache {
    pub fn get<T: 'static>(&self, key: &'static str) -> Option<Rc<T>> {
        let cached = self.cache.borrow().get(key).cloned()?;
        cached.downcast::<T>().ok()
    }

    pub fn contains(&self, key: &'static str) -> bool {
        self.cache.borrow().contains_key(key)
    }

    pub fn get_or_init<T: 'static, F: FnOnce() -> T>(&self, key: &'static str, init: F) -> Rc<T> {
        if let Some(cached) = self.get::<T>(key) {
            return cached;
        }
        self.insert(key, init())
    }

    pub fn get_or_try_init<T: 'static, F: FnOnce() -> Result<T>>(
        &self,
        key: &'static str,
        init: F,
    ) -> Result<Rc<T>> {
        if let Some(cached) = self.get::<T>(key) {
            return Ok(cached);
        }
        Ok(self.insert(key, init()?))
    }

    /// A key holds one type for the cache's lifetime.
    fn insert<T: 'static>(&self, key: &'static str, value: T) -> Rc<T> {
        debug_assert!(!self.contains(key), "cache key '{}' reused with another type", key);
        debug!("Caching {}", key);
        let value = Rc::new(value);
        let erased: Rc<dyn Any> = value.clone();
        self.cache.borrow_mut().insert(key, erased);
        value
    }
}

impl Clone for LazyCache {
    fn clone(&self) -> Self {
        LazyCache::default()
    }
}

impl fmt::Debug for LazyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cache.borrow().keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once() {
        let cache = LazyCache::default();
        let calls = Cell::new(0);

        let compute = || {
            calls.set(calls.get() + 1);
            vec![1, 2, 3]
        };
        let a = cache.get_or_init("numbers", compute);
        let b = cache.get_or_init("numbers", || vec![4]);

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(*b, vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);
        assert!(cache.contains("numbers"));
    }

    #[test]
    fn test_failed_init_is_not_cached() {
        let cache = LazyCache::default();

        let failed: Result<Rc<u32>> = cache.get_or_try_init("n", || anyhow::bail!("not yet"));
        assert!(failed.is_err());
        assert!(!cache.contains("n"));

        let n = cache.get_or_try_init("n", || Ok(7u32)).unwrap();
        assert_eq!(*n, 7);
    }

    #[test]
    fn test_clone_starts_empty() {
        let cache = LazyCache::default();
        cache.get_or_init("s", || "value".to_string());

        let cloned = cache.clone();
        assert!(!cloned.contains("s"));
        assert!(cloned.get::<String>("s").is_none());
        assert_eq!(*cache.get::<String>("s").unwrap(), "value");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "reused with another type")]
    fn test_key_keeps_its_type() {
        let cache = LazyCache::default();
        cache.get_or_init("n", || 7u32);
        cache.get_or_init("n", || "seven".to_string());
    }
}
