//! Ordered collection helpers
//!
//! Gallery images, contact people and approved notes share one ordering
//! scheme: an integer `order` assigned on append and rewritten only by an
//! explicit reorder batch. Deletes leave gaps until the next reorder.

use super::models::{ContactPerson, GalleryImage, Note, NoteSort};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Item that can be placed by hand
pub trait Ordered {
    fn id(&self) -> &str;
    fn order(&self) -> Option<i64>;
    fn set_order(&mut self, order: i64);
    fn created_at(&self) -> DateTime<Utc>;
}

impl Ordered for GalleryImage {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> Option<i64> {
        Some(self.order)
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Ordered for ContactPerson {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> Option<i64> {
        Some(self.order)
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Ordered for Note {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Order value for an item appended to a collection of `len` items
pub fn next_order(len: usize) -> i64 {
    len as i64
}

/// Check a reorder batch before anything is written.
///
/// Every id must be known and appear once; otherwise the whole batch is
/// refused.
pub fn validate_reorder<F>(ids: &[String], is_known: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::with_capacity(ids.len());

    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(AppError::InvalidReorder(format!("Duplicate id: {}", id)));
        }
        if !is_known(id) {
            return Err(AppError::InvalidReorder(format!("Unknown id: {}", id)));
        }
    }

    Ok(())
}

/// Set `order = position` for every listed item, all or nothing.
pub fn apply_reorder<T: Ordered>(items: &mut [T], ids: &[String]) -> Result<()> {
    validate_reorder(ids, |id| items.iter().any(|item| item.id() == id))?;

    for (position, id) in ids.iter().enumerate() {
        if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
            item.set_order(position as i64);
        }
    }

    Ok(())
}

/// Ascending by order; ties (or missing orders) fall back to creation time
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by(|a, b| {
        let by_order = match (a.order(), b.order()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_order.then_with(|| a.created_at().cmp(&b.created_at()))
    });
}

/// Sort a note listing in place
pub fn sort_notes(notes: &mut [Note], sort: NoteSort) {
    match sort {
        NoteSort::Newest => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        NoteSort::Manual => notes.sort_by(|a, b| match (a.order, b.order) {
            (None, None) => b.created_at.cmp(&a.created_at),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| b.created_at.cmp(&a.created_at)),
        }),
    }
}
