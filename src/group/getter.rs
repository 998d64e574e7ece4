//! Getter Module
//!
//! The source-of-truth capability a group falls back to on a miss.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

// == Getter ==
/// Loads data for a key from the source of truth.
///
/// Implementations report a missing key with
/// [`CacheError::NotFound`](crate::error::CacheError::NotFound).
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

// == Getter Func ==
/// Adapts a plain function into a [`Getter`].
pub struct GetterFunc<F>(pub F);

#[async_trait]
impl<F> Getter for GetterFunc<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for GetterFunc<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GetterFunc")
    }
}
