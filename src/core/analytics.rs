use crate::domain::model::{
    AnalyticsReport, ClothingItem, ClothingType, Combination, ItemPerformance, Preferences,
    WardrobeStats,
};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

pub fn analyze(
    shirts: &[ClothingItem],
    pants: &[ClothingItem],
    preferences: &Preferences,
) -> AnalyticsReport {
    let liked = preferences.values().filter(|&&v| v).count();
    let disliked = preferences.values().filter(|&&v| !v).count();

    let shirt_performance = rank(shirts.iter().map(|shirt| {
        let hits = pants
            .iter()
            .filter(|p| is_liked(preferences, &shirt.id, &p.id))
            .count();
        performance(shirt, hits, pants.len())
    }));

    let pants_performance = rank(pants.iter().map(|p| {
        let hits = shirts
            .iter()
            .filter(|shirt| is_liked(preferences, &shirt.id, &p.id))
            .count();
        performance(p, hits, shirts.len())
    }));

    AnalyticsReport {
        stats: WardrobeStats {
            shirts: shirts.len(),
            pants: pants.len(),
            combinations: shirts.len() * pants.len(),
            liked,
            disliked,
        },
        shirt_performance,
        pants_performance,
    }
}

fn is_liked(preferences: &Preferences, shirt_id: &str, pants_id: &str) -> bool {
    preferences
        .get(&Combination::id_for(shirt_id, pants_id))
        .copied()
        .unwrap_or(false)
}

fn performance(item: &ClothingItem, liked: usize, total: usize) -> ItemPerformance {
    let rate = if total > 0 {
        liked as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    ItemPerformance {
        item: item.clone(),
        liked,
        total,
        performance: rate,
    }
}

/// 表現最差的排前面；`sort_by` 是穩定排序，同分維持目錄順序
fn rank(items: impl Iterator<Item = ItemPerformance>) -> Vec<ItemPerformance> {
    let mut ranked: Vec<ItemPerformance> = items.collect();
    ranked.sort_by(|a, b| a.performance.total_cmp(&b.performance));
    ranked
}

#[derive(Debug, Serialize)]
struct PerformanceRow<'a> {
    category: ClothingType,
    id: &'a str,
    original_name: &'a str,
    liked: usize,
    total: usize,
    performance: String,
}

/// 以 CSV 匯出每件衣物的喜好比例 (上衣在前，褲子在後，各自維持排序)
pub fn write_performance_csv<W: Write>(report: &AnalyticsReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let sections = [
        (ClothingType::Shirts, &report.shirt_performance),
        (ClothingType::Pants, &report.pants_performance),
    ];
    for (category, rows) in sections {
        for row in rows.iter() {
            csv_writer.serialize(PerformanceRow {
                category,
                id: &row.item.id,
                original_name: &row.item.original_name,
                liked: row.liked,
                total: row.total,
                performance: format!("{:.1}", row.performance),
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
