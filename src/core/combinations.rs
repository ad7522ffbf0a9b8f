use crate::domain::model::{ClothingItem, Combination};
use crate::utils::error::{Result, WardrobeError};

/// 產生所有上衣 × 褲子的組合 (row-major：先 shirts[0] 配每條褲子，再 shirts[1]...)
pub fn generate_combinations(
    shirts: &[ClothingItem],
    pants: &[ClothingItem],
) -> Result<Vec<Combination>> {
    if shirts.is_empty() || pants.is_empty() {
        return Err(WardrobeError::EmptyInput);
    }

    let combinations: Vec<Combination> = shirts
        .iter()
        .flat_map(|shirt| pants.iter().map(move |p| Combination::new(shirt, p)))
        .collect();

    tracing::debug!(
        "Generated {} combinations from {} shirts and {} pants",
        combinations.len(),
        shirts.len(),
        pants.len()
    );

    Ok(combinations)
}
