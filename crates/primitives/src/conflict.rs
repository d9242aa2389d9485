use serde::{Deserialize, Serialize};

/// A server-reported adjustment made to a requested line item during
/// reconciliation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub reason: String,
    pub requested: u32,
    pub applied: u32,
}

impl ConflictEntry {
    #[must_use]
    pub fn new(
        item_id: impl Into<String>,
        name: Option<String>,
        reason: impl Into<String>,
        requested: u32,
        applied: u32,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name,
            reason: reason.into(),
            requested,
            applied,
        }
    }

    /// The label shown to the user; falls back to the item id when the
    /// server did not echo a display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.item_id)
    }
}

/// Line-item adjustments the server made while resolving a cart.
///
/// Produced only by the server; the client never invents conflicts. The
/// three buckets keep their arrival order.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    #[serde(default)]
    pub dropped: Vec<ConflictEntry>,
    #[serde(default)]
    pub clamped: Vec<ConflictEntry>,
    #[serde(default)]
    pub merged: Vec<ConflictEntry>,
}

impl ConflictReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty() && self.clamped.is_empty() && self.merged.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dropped.len() + self.clamped.len() + self.merged.len()
    }

    /// Fold another report into this one, bucket by bucket. Entries of
    /// `self` stay ahead of entries of `other`, so a pending report
    /// recovered from a prior session is surfaced before a fresh one.
    pub fn merge(&mut self, other: Self) {
        self.dropped.extend(other.dropped);
        self.clamped.extend(other.clamped);
        self.merged.extend(other.merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_pending_entries_first() {
        let mut pending = ConflictReport::default();
        pending
            .dropped
            .push(ConflictEntry::new("salad", None, "out of stock", 2, 0));

        let mut fresh = ConflictReport::default();
        fresh.dropped.push(ConflictEntry::new(
            "pizza",
            Some("Margherita".to_owned()),
            "limited stock",
            3,
            1,
        ));

        pending.merge(fresh);

        assert_eq!(pending.len(), 2);
        assert_eq!(pending.dropped[0].item_id, "salad");
        assert_eq!(pending.dropped[1].item_id, "pizza");
    }

    #[test]
    fn display_name_falls_back_to_item_id() {
        let anonymous = ConflictEntry::new("soda", None, "merged", 1, 2);
        let named = ConflictEntry::new("soda", Some("Soda".to_owned()), "merged", 1, 2);

        assert_eq!(anonymous.display_name(), "soda");
        assert_eq!(named.display_name(), "Soda");
    }
}
