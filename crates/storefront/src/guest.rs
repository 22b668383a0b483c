//! Guest-scoped cart and wishlist persistence.
//!
//! The browser storefront keeps guest state under localStorage keys `cart`
//! and `wishlist`; here the same document lives in one JSON file. The store
//! owns guest data for the lifetime of the profile directory and is the
//! single mutable shared resource of guest mode: every mutation is a
//! read-modify-write of the whole collection under the lock, never an
//! index-patch of a possibly-stale snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lotus_threads_core::{CartItem, ProductId};

/// Errors from the guest store.
#[derive(Debug, Error)]
pub enum GuestStoreError {
    /// Reading or writing the backing file failed.
    #[error("guest store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON for the expected document.
    #[error("guest store parse error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The persisted guest document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct GuestDoc {
    #[serde(default)]
    cart: Vec<CartItem>,
    #[serde(default)]
    wishlist: Vec<ProductId>,
}

/// File-backed store for a guest's cart and wishlist.
#[derive(Debug)]
pub struct GuestStore {
    path: PathBuf,
    doc: Mutex<GuestDoc>,
}

impl GuestStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// A missing file is an empty store, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GuestStoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            GuestDoc::default()
        };
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Snapshot of the guest cart lines.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.lock().cart.clone()
    }

    /// Snapshot of the guest wishlist membership.
    #[must_use]
    pub fn wishlist(&self) -> Vec<ProductId> {
        self.lock().wishlist.clone()
    }

    /// Mutate the cart collection as a whole and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated document fails; the
    /// in-memory state is rolled back so a failed write leaves prior state
    /// untouched.
    pub fn with_cart<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<CartItem>) -> R,
    ) -> Result<R, GuestStoreError> {
        let mut guard = self.lock();
        let previous = guard.cart.clone();
        let result = mutate(&mut guard.cart);
        if let Err(e) = self.persist(&guard) {
            guard.cart = previous;
            return Err(e);
        }
        Ok(result)
    }

    /// Mutate the wishlist collection as a whole and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated document fails; the
    /// in-memory state is rolled back on failure.
    pub fn with_wishlist<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<ProductId>) -> R,
    ) -> Result<R, GuestStoreError> {
        let mut guard = self.lock();
        let previous = guard.wishlist.clone();
        let result = mutate(&mut guard.wishlist);
        if let Err(e) = self.persist(&guard) {
            guard.wishlist = previous;
            return Err(e);
        }
        Ok(result)
    }

    fn persist(&self, doc: &GuestDoc) -> Result<(), GuestStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(doc)?)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GuestDoc> {
        self.doc.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
