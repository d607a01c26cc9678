//! Session-lifetime favorites. Owned by the interactive caller, never by the
//! pipeline; lost on exit by design.

use crate::models::{Listing, ListingKey};
use std::collections::HashSet;

/// Add-only accumulation of listings, deduplicated by title + price and kept
/// in insertion order.
#[derive(Debug, Default)]
pub struct Favorites {
    keys: HashSet<ListingKey>,
    listings: Vec<Listing>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical listing was already saved.
    pub fn add(&mut self, listing: Listing) -> bool {
        if !self.keys.insert(listing.key()) {
            return false;
        }
        self.listings.push(listing);
        true
    }

    pub fn contains(&self, listing: &Listing) -> bool {
        self.keys.contains(&listing.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
