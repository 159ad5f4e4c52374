/// Type-state markers for the builder pattern
///
/// These types are used to track which fields have been set
/// in the builder at compile-time, preventing invalid configurations.
use std::marker::PhantomData;

/// Marker trait for URL state
pub trait UrlState {}

/// URL has not been set
pub struct NoUrl;
impl UrlState for NoUrl {}

/// URL has been set
pub struct HasUrl;
impl UrlState for HasUrl {}

/// Marker trait for store state
pub trait StoreState {}

/// Store has not been set
pub struct NoStore;
impl StoreState for NoStore {}

/// Store has been set
pub struct HasStore;
impl StoreState for HasStore {}

/// Phantom marker to prevent direct construction
#[derive(Debug, Clone, Copy)]
pub struct TypeState<U, S> {
    _url: PhantomData<U>,
    _store: PhantomData<S>,
}

impl<U, S> TypeState<U, S> {
    pub(crate) fn new() -> Self {
        Self {
            _url: PhantomData,
            _store: PhantomData,
        }
    }
}

impl<U, S> Default for TypeState<U, S> {
    fn default() -> Self {
        Self::new()
    }
}
