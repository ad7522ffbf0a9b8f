pub mod analytics;
pub mod combinations;
pub mod planner;
pub mod wardrobe;

pub use crate::domain::model::{
    AnalyticsReport, ClothingItem, ClothingType, Combination, Preferences, WardrobeData,
    WeeklyPlan,
};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
