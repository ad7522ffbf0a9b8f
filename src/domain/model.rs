use crate::utils::error::{Result, WardrobeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// 一週的天數，也是每週穿搭計畫的固定長度
pub const WEEK_LENGTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    Shirts,
    Pants,
}

impl ClothingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Shirts => "shirts",
            ClothingType::Pants => "pants",
        }
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClothingType {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shirts" => Ok(ClothingType::Shirts),
            "pants" => Ok(ClothingType::Pants),
            other => Err(WardrobeError::InvalidClothingType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub original_name: String,
}

/// 一件上衣與一件褲子的組合，id 固定為 `<shirt.id>_<pants.id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub id: String,
    pub shirt: ClothingItem,
    pub pants: ClothingItem,
}

impl Combination {
    pub fn new(shirt: &ClothingItem, pants: &ClothingItem) -> Self {
        Self {
            id: Self::id_for(&shirt.id, &pants.id),
            shirt: shirt.clone(),
            pants: pants.clone(),
        }
    }

    pub fn id_for(shirt_id: &str, pants_id: &str) -> String {
        format!("{}_{}", shirt_id, pants_id)
    }

    pub fn shirt_id(&self) -> &str {
        &self.shirt.id
    }

    pub fn pants_id(&self) -> &str {
        &self.pants.id
    }
}

/// combination id -> liked
pub type Preferences = BTreeMap<String, bool>;

/// 七天不重複上衣、不重複褲子的穿搭計畫
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    outfits: Vec<Combination>,
}

impl WeeklyPlan {
    pub fn new(outfits: Vec<Combination>) -> Result<Self> {
        if outfits.len() != WEEK_LENGTH {
            return Err(WardrobeError::ValidationError {
                message: format!(
                    "A weekly plan needs exactly {} outfits, got {}",
                    WEEK_LENGTH,
                    outfits.len()
                ),
            });
        }

        let mut shirts = HashSet::new();
        let mut pants = HashSet::new();
        for outfit in &outfits {
            if !shirts.insert(outfit.shirt_id()) {
                return Err(WardrobeError::ValidationError {
                    message: format!("Shirt '{}' repeats within the week", outfit.shirt_id()),
                });
            }
            if !pants.insert(outfit.pants_id()) {
                return Err(WardrobeError::ValidationError {
                    message: format!("Pants '{}' repeat within the week", outfit.pants_id()),
                });
            }
        }

        Ok(Self { outfits })
    }

    pub fn outfits(&self) -> &[Combination] {
        &self.outfits
    }

    pub fn into_outfits(self) -> Vec<Combination> {
        self.outfits
    }
}

/// 持久化的衣櫥資料文件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardrobeData {
    pub shirts: Vec<ClothingItem>,
    pub pants: Vec<ClothingItem>,
    pub combinations: Vec<Combination>,
    pub preferences: Preferences,
    pub weekly_outfits: Vec<Combination>,
}

impl WardrobeData {
    pub fn items(&self, kind: ClothingType) -> &[ClothingItem] {
        match kind {
            ClothingType::Shirts => &self.shirts,
            ClothingType::Pants => &self.pants,
        }
    }

    pub fn items_mut(&mut self, kind: ClothingType) -> &mut Vec<ClothingItem> {
        match kind {
            ClothingType::Shirts => &mut self.shirts,
            ClothingType::Pants => &mut self.pants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPerformance {
    pub item: ClothingItem,
    pub liked: usize,
    pub total: usize,
    pub performance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardrobeStats {
    pub shirts: usize,
    pub pants: usize,
    pub combinations: usize,
    pub liked: usize,
    pub disliked: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub stats: WardrobeStats,
    pub shirt_performance: Vec<ItemPerformance>,
    pub pants_performance: Vec<ItemPerformance>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_clothing_type_parsing() {
        assert_eq!("shirts".parse::<ClothingType>().unwrap(), ClothingType::Shirts);
        assert_eq!("pants".parse::<ClothingType>().unwrap(), ClothingType::Pants);
        assert!(matches!(
            "socks".parse::<ClothingType>(),
            Err(WardrobeError::InvalidClothingType(ref s)) if s == "socks"
        ));
    }

    #[test]
    fn test_combination_id_scheme() {
        let c = combo("1700000000000_1234", "1700000000001_5678");
        assert_eq!(c.id, "1700000000000_1234_1700000000001_5678");
        assert_eq!(c.shirt_id(), "1700000000000_1234");
        assert_eq!(c.pants_id(), "1700000000001_5678");
    }

    #[test]
    fn test_weekly_plan_accepts_disjoint_week() {
        let plan = WeeklyPlan::new(diagonal(7)).unwrap();
        assert_eq!(plan.outfits().len(), 7);
    }

    #[test]
    fn test_weekly_plan_rejects_wrong_length() {
        assert!(WeeklyPlan::new(diagonal(6)).is_err());
        assert!(WeeklyPlan::new(diagonal(8)).is_err());
    }

    #[test]
    fn test_weekly_plan_rejects_repeated_shirt() {
        let mut outfits = diagonal(6);
        outfits.push(combo("S1", "P7"));
        let err = WeeklyPlan::new(outfits).unwrap_err();
        assert!(err.to_string().contains("Shirt 'S1'"));
    }

    #[test]
    fn test_weekly_plan_rejects_repeated_pants() {
        let mut outfits = diagonal(6);
        outfits.push(combo("S7", "P3"));
        let err = WeeklyPlan::new(outfits).unwrap_err();
        assert!(err.to_string().contains("Pants 'P3'"));
    }

    #[test]
    fn test_wardrobe_data_loads_partial_document() {
        let json = r#"{"shirts": [{"id": "a", "filename": "a.jpg", "url": "/static/uploads/a.jpg", "original_name": "A.jpg"}]}"#;
        let data: WardrobeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.shirts.len(), 1);
        assert!(data.pants.is_empty());
        assert!(data.preferences.is_empty());
        assert!(data.weekly_outfits.is_empty());
    }

    #[test]
    fn test_wardrobe_data_serializes_original_layout() {
        let mut data = WardrobeData::default();
        data.shirts.push(item("s"));
        data.pants.push(item("p"));
        data.combinations.push(combo("s", "p"));
        data.preferences.insert("s_p".to_string(), true);

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["combinations"][0]["id"], "s_p");
        assert_eq!(value["combinations"][0]["shirt"]["id"], "s");
        assert_eq!(value["preferences"]["s_p"], true);
        assert!(value["weekly_outfits"].as_array().unwrap().is_empty());
    }
}
