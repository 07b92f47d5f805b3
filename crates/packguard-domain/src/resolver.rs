use std::cell::RefCell;
use std::collections::HashMap;

/// Maps a symbol name to the project-relative file that defines it.
///
/// Used only by rename suppression. Implementations should treat a leading
/// `::` as part of the name they were given and strip it themselves.
pub trait SymbolResolver {
    fn resolve(&self, symbol_name: &str) -> Option<String>;
}

impl<F> SymbolResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, symbol_name: &str) -> Option<String> {
        self(symbol_name)
    }
}

/// Memoizes another resolver for the lifetime of the wrapper.
///
/// The cache belongs to whoever owns the wrapper; call [`CachingResolver::reset`]
/// when the underlying project layout may have changed.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl<R: SymbolResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn reset(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: SymbolResolver> SymbolResolver for CachingResolver<R> {
    fn resolve(&self, symbol_name: &str) -> Option<String> {
        if let Some(hit) = self.cache.borrow().get(symbol_name) {
            return hit.clone();
        }
        let resolved = self.inner.resolve(symbol_name);
        self.cache
            .borrow_mut()
            .insert(symbol_name.to_string(), resolved.clone());
        resolved
    }
}
