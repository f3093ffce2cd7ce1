//! # Draft Bill State
//!
//! Manages in-progress bills, one per booking, while the front desk
//! assembles them.
//!
//! ## Thread Safety
//! Drafts live behind an `Arc<Mutex<HashMap>>` because:
//! 1. Multiple handlers may touch drafts concurrently
//! 2. Only one handler should modify a draft at a time
//! 3. Operations are quick; a Mutex keeps the locking simple
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Bill Operations                                │
//! │                                                                         │
//! │  Front Desk Action         Endpoint                 Draft Change        │
//! │  ─────────────────         ────────                 ────────────        │
//! │                                                                         │
//! │  Select service ─────────► POST items ────────────► items.push(item)   │
//! │                                                                         │
//! │  Approve override ───────► POST overrides ────────► item overridden    │
//! │                                                     (after audit write) │
//! │                                                                         │
//! │  Remove line ────────────► DELETE item ───────────► items.remove(i)    │
//! │                                                                         │
//! │  Checkout ───────────────► POST bills ────────────► draft consumed     │
//! │                                                                         │
//! │  Drafts are process-local working state. Nothing is durable until      │
//! │  checkout writes the bill; abandoning a draft costs nothing.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salon_core::{BillLineItem, MAX_DRAFT_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Draft Bill
// =============================================================================

/// An in-progress bill for one booking.
///
/// ## Invariants
/// - Lines are unique by (service_id, staff_id); adding the same pair
///   increases quantity
/// - Quantity must be > 0
/// - Maximum lines: 50, maximum quantity per line: 99
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBill {
    /// Booking this draft belongs to
    pub booking_id: String,

    /// Service lines in the order they were added
    pub items: Vec<BillLineItem>,

    /// When the draft was started
    pub created_at: DateTime<Utc>,
}

impl DraftBill {
    /// Creates a new empty draft for a booking.
    pub fn new(booking_id: impl Into<String>) -> Self {
        DraftBill {
            booking_id: booking_id.into(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a service line, merging with an existing line for the same
    /// service and staff member.
    pub fn add_item(&mut self, item: BillLineItem) -> Result<(), String> {
        if item.quantity <= 0 {
            return Err("Quantity must be positive".to_string());
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.service_id == item.service_id && i.staff_id == item.staff_id)
        {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(format!(
                    "Quantity would exceed maximum of {}",
                    MAX_ITEM_QUANTITY
                ));
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_DRAFT_ITEMS {
            return Err(format!(
                "A bill cannot have more than {} lines",
                MAX_DRAFT_ITEMS
            ));
        }

        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(format!("Quantity cannot exceed {}", MAX_ITEM_QUANTITY));
        }

        self.items.push(item);
        Ok(())
    }

    /// Finds a line by service ID.
    pub fn find_item(&self, service_id: &str) -> Option<&BillLineItem> {
        self.items.iter().find(|i| i.service_id == service_id)
    }

    /// Replaces a line with its override-applied copy.
    ///
    /// Called only after the override audit record is durably stored, so a
    /// failed write never leaves a half-applied draft.
    pub fn apply_override(&mut self, updated: BillLineItem) -> Result<(), String> {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.service_id == updated.service_id)
        {
            *existing = updated;
            Ok(())
        } else {
            Err(format!("Service {} not on this draft", updated.service_id))
        }
    }

    /// Removes a line by service ID.
    pub fn remove_item(&mut self, service_id: &str) -> Result<(), String> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.service_id != service_id);

        if self.items.len() == initial_len {
            Err(format!("Service {} not on this draft", service_id))
        } else {
            Ok(())
        }
    }

    /// Number of lines on the draft.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Running subtotal in paise (effective prices × quantities).
    pub fn subtotal_paise(&self) -> i64 {
        self.items.iter().map(|i| i.line_total().paise()).sum()
    }

    /// Checks if the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Draft State
// =============================================================================

/// Process-wide draft storage, one draft per booking.
///
/// ## Why Not RwLock?
/// Draft operations are quick and most of them write. A Mutex keeps the
/// locking story simple.
#[derive(Debug, Clone, Default)]
pub struct DraftState {
    drafts: Arc<Mutex<HashMap<String, DraftBill>>>,
}

impl DraftState {
    /// Creates empty draft storage.
    pub fn new() -> Self {
        DraftState {
            drafts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Executes a function with read access to a booking's draft, if one
    /// exists.
    pub fn with_draft<F, R>(&self, booking_id: &str, f: F) -> R
    where
        F: FnOnce(Option<&DraftBill>) -> R,
    {
        let drafts = self.drafts.lock().expect("Draft mutex poisoned");
        f(drafts.get(booking_id))
    }

    /// Executes a function with write access to a booking's draft,
    /// creating an empty draft first if none exists.
    pub fn with_draft_mut<F, R>(&self, booking_id: &str, f: F) -> R
    where
        F: FnOnce(&mut DraftBill) -> R,
    {
        let mut drafts = self.drafts.lock().expect("Draft mutex poisoned");
        let draft = drafts
            .entry(booking_id.to_string())
            .or_insert_with(|| DraftBill::new(booking_id));
        f(draft)
    }

    /// Drops a booking's draft (after checkout, or on explicit clear).
    pub fn remove(&self, booking_id: &str) -> Option<DraftBill> {
        let mut drafts = self.drafts.lock().expect("Draft mutex poisoned");
        drafts.remove(booking_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
