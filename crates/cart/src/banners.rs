//! Projection of server conflict reports into user-facing banners.

use rbos_primitives::conflict::ConflictReport;

/// One banner string per conflict entry, in a stable order: dropped,
/// then clamped, then merged. Each reconciliation's conflicts are a
/// fresh batch; callers append these to the existing banners without
/// deduplication.
#[must_use]
pub fn project_banners(report: &ConflictReport) -> Vec<String> {
    let mut banners = Vec::with_capacity(report.len());

    banners.extend(
        report
            .dropped
            .iter()
            .map(|entry| format!("{} removed ({})", entry.display_name(), entry.reason)),
    );
    banners.extend(report.clamped.iter().map(|entry| {
        format!(
            "{} adjusted to {} ({})",
            entry.display_name(),
            entry.applied,
            entry.reason
        )
    }));
    banners.extend(report.merged.iter().map(|entry| {
        format!(
            "{} combined into one line ({})",
            entry.display_name(),
            entry.reason
        )
    }));

    banners
}

#[cfg(test)]
mod tests {
    use rbos_primitives::conflict::ConflictEntry;

    use super::*;

    #[test]
    fn one_banner_per_entry_in_stable_order() {
        let report = ConflictReport {
            dropped: vec![ConflictEntry::new(
                "salad",
                Some("Garden Salad".to_owned()),
                "out of stock",
                2,
                0,
            )],
            clamped: vec![ConflictEntry::new(
                "pizza",
                Some("Margherita".to_owned()),
                "limited stock",
                3,
                1,
            )],
            merged: vec![ConflictEntry::new(
                "soda",
                Some("Soda".to_owned()),
                "already in your cart",
                1,
                2,
            )],
        };

        let banners = project_banners(&report);

        assert_eq!(
            banners,
            vec![
                "Garden Salad removed (out of stock)".to_owned(),
                "Margherita adjusted to 1 (limited stock)".to_owned(),
                "Soda combined into one line (already in your cart)".to_owned(),
            ]
        );
    }

    #[test]
    fn unnamed_entries_fall_back_to_item_id() {
        let report = ConflictReport {
            dropped: vec![ConflictEntry::new("salad", None, "out of stock", 1, 0)],
            ..ConflictReport::default()
        };

        assert_eq!(
            project_banners(&report),
            vec!["salad removed (out of stock)".to_owned()]
        );
    }

    #[test]
    fn empty_report_projects_nothing() {
        assert!(project_banners(&ConflictReport::default()).is_empty());
    }
}
