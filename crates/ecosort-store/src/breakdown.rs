//! Category totals across scans, as shown by the history chart

use ecosort_types::{ScanResult, WasteCategory};
use serde::Serialize;

/// One slice of the category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub category: WasteCategory,
    pub count: usize,
    pub color: &'static str,
}

/// Count items per category over all scans.
///
/// Slices follow [`WasteCategory::ALL`] order; empty categories are left out.
pub fn category_breakdown(scans: &[ScanResult]) -> Vec<CategorySlice> {
    let mut counts = [0usize; WasteCategory::ALL.len()];
    for item in scans.iter().flat_map(|scan| scan.items.iter()) {
        if let Some(index) = WasteCategory::ALL.iter().position(|c| *c == item.category) {
            counts[index] += 1;
        }
    }

    WasteCategory::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| CategorySlice {
            category: *category,
            count,
            color: category.chart_color(),
        })
        .collect()
}

pub fn total_items(slices: &[CategorySlice]) -> usize {
    slices.iter().map(|s| s.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ecosort_types::WasteItem;

    fn scan(categories: &[WasteCategory]) -> ScanResult {
        ScanResult {
            id: "scan".to_string(),
            timestamp: Utc::now(),
            items: categories
                .iter()
                .map(|c| WasteItem {
                    item_name: "thing".to_string(),
                    material: "stuff".to_string(),
                    category: *c,
                    confidence: 0.5,
                    disposal_instruction: "Bin it.".to_string(),
                    recycling_tips: vec![],
                    fun_fact: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_breakdown_counts_across_scans() {
        let scans = vec![
            scan(&[WasteCategory::Recyclable, WasteCategory::Biodegradable]),
            scan(&[WasteCategory::Recyclable, WasteCategory::EWaste]),
        ];
        let slices = category_breakdown(&scans);

        let summary: Vec<(WasteCategory, usize)> =
            slices.iter().map(|s| (s.category, s.count)).collect();
        assert_eq!(
            summary,
            vec![
                (WasteCategory::Biodegradable, 1),
                (WasteCategory::Recyclable, 2),
                (WasteCategory::EWaste, 1),
            ]
        );
        assert_eq!(slices[1].color, "#93c5fd");
        assert_eq!(total_items(&slices), 4);
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(category_breakdown(&[]).is_empty());
        assert!(category_breakdown(&[scan(&[])]).is_empty());
    }
}
