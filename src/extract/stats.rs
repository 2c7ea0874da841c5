//! Statistics collected while extracting one entity.

use serde::{Deserialize, Serialize};

use super::classify::LayoutVariant;

/// Statistics collected during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages read
    pub page_count: u32,

    /// Pages skipped as placeholders
    pub placeholder_pages: u32,

    /// Tables read
    pub table_count: u32,

    /// Tables classified as single-value rows
    pub single_value_tables: u32,

    /// Tables classified as pivot/mark tables
    pub pivot_tables: u32,

    /// Tables classified as cross tables
    pub cross_tables: u32,

    /// Pairs emitted by flattening (page text included)
    pub pair_count: u32,

    /// Rows rejected with a structural anomaly
    pub rejected_rows: u32,

    /// Pairs stored under a suffixed key
    pub collision_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified table.
    pub fn add_table(&mut self, layout: LayoutVariant) {
        self.table_count += 1;
        match layout {
            LayoutVariant::SingleValueRow => self.single_value_tables += 1,
            LayoutVariant::PivotMark => self.pivot_tables += 1,
            LayoutVariant::CrossTable => self.cross_tables += 1,
        }
    }

    /// Merge statistics from another entity.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.placeholder_pages += other.placeholder_pages;
        self.table_count += other.table_count;
        self.single_value_tables += other.single_value_tables;
        self.pivot_tables += other.pivot_tables;
        self.cross_tables += other.cross_tables;
        self.pair_count += other.pair_count;
        self.rejected_rows += other.rejected_rows;
        self.collision_count += other.collision_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_table() {
        let mut stats = ExtractionStats::new();
        stats.add_table(LayoutVariant::PivotMark);
        stats.add_table(LayoutVariant::CrossTable);
        stats.add_table(LayoutVariant::CrossTable);

        assert_eq!(stats.table_count, 3);
        assert_eq!(stats.pivot_tables, 1);
        assert_eq!(stats.cross_tables, 2);
        assert_eq!(stats.single_value_tables, 0);
    }

    #[test]
    fn test_merge() {
        let mut a = ExtractionStats {
            page_count: 6,
            pair_count: 10,
            ..Default::default()
        };
        let b = ExtractionStats {
            page_count: 6,
            collision_count: 2,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.page_count, 12);
        assert_eq!(a.pair_count, 10);
        assert_eq!(a.collision_count, 2);
    }
}
