use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::HashSet;
use wardrobe_planner::core::combinations::generate_combinations;
use wardrobe_planner::core::planner::liked_combinations;
use wardrobe_planner::domain::model::{ClothingItem, Preferences};
use wardrobe_planner::{PlannerConfig, WardrobeError, WeeklyPlanner};

fn items(prefix: &str, n: usize) -> Vec<ClothingItem> {
    (0..n)
        .map(|i| ClothingItem {
            id: format!("{}{}", prefix, i),
            filename: format!("{}{}.jpg", prefix, i),
            url: format!("/static/uploads/{}{}.jpg", prefix, i),
            original_name: format!("{}{}.jpg", prefix, i),
        })
        .collect()
}

/// 較小的搜尋上限，讓無解的隨機案例也能很快結束
fn planner(seed: u64) -> WeeklyPlanner {
    WeeklyPlanner::new(PlannerConfig {
        max_attempts: 20,
        max_steps_per_attempt: 20_000,
        seed: Some(seed),
    })
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn combinations_cover_cross_product(shirt_count in 1usize..12, pants_count in 1usize..12) {
        let shirts = items("s", shirt_count);
        let pants = items("p", pants_count);

        let combos = generate_combinations(&shirts, &pants).expect("non-empty input");
        prop_assert_eq!(combos.len(), shirt_count * pants_count);

        let ids: HashSet<&str> = combos.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(ids.len(), combos.len());

        for combo in &combos {
            prop_assert!(shirts.iter().any(|s| s.id == combo.shirt.id));
            prop_assert!(pants.iter().any(|p| p.id == combo.pants.id));
            prop_assert_eq!(&combo.id, &format!("{}_{}", combo.shirt.id, combo.pants.id));
        }
    }

    #[test]
    fn successful_plans_are_disjoint_and_liked(
        shirt_count in 7usize..10,
        pants_count in 7usize..10,
        likes in proptest::collection::vec(any::<bool>(), 100),
        seed in any::<u64>(),
    ) {
        let shirts = items("s", shirt_count);
        let pants = items("p", pants_count);
        let combos = generate_combinations(&shirts, &pants).expect("non-empty input");

        let mut prefs = Preferences::new();
        for (combo, liked) in combos.iter().zip(likes.iter()) {
            prefs.insert(combo.id.clone(), *liked);
        }
        let liked = liked_combinations(&combos, &prefs);

        match planner(seed).plan(&liked) {
            Ok(plan) => {
                prop_assert_eq!(plan.outfits().len(), 7);
                let shirt_ids: HashSet<&str> = plan.outfits().iter().map(|c| c.shirt_id()).collect();
                let pants_ids: HashSet<&str> = plan.outfits().iter().map(|c| c.pants_id()).collect();
                prop_assert_eq!(shirt_ids.len(), 7);
                prop_assert_eq!(pants_ids.len(), 7);
                for outfit in plan.outfits() {
                    prop_assert_eq!(prefs.get(&outfit.id), Some(&true));
                }
            }
            Err(WardrobeError::InsufficientLikedCombinations { count }) => {
                prop_assert_eq!(count, liked.len());
                prop_assert!(count < 7);
            }
            Err(WardrobeError::NoFeasiblePlanFound { best_partial, .. }) => {
                prop_assert!(best_partial < 7);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn fixed_seed_is_deterministic(seed in any::<u64>()) {
        let combos = generate_combinations(&items("s", 9), &items("p", 8)).expect("non-empty input");
        let first = planner(seed).plan(&combos).expect("full grid is feasible");
        let second = planner(seed).plan(&combos).expect("full grid is feasible");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn diagonal_is_always_found(seed in any::<u64>()) {
        let shirts = items("s", 7);
        let pants = items("p", 7);
        let combos = generate_combinations(&shirts, &pants).expect("non-empty input");

        let mut prefs = Preferences::new();
        for i in 0..7 {
            prefs.insert(format!("s{}_p{}", i, i), true);
        }
        let liked = liked_combinations(&combos, &prefs);

        let plan = planner(seed).plan(&liked).expect("diagonal is feasible");
        let mut ids: Vec<String> = plan.outfits().iter().map(|c| c.id.clone()).collect();
        ids.sort();
        let expected: Vec<String> = (0..7).map(|i| format!("s{}_p{}", i, i)).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn too_few_distinct_pants_never_plans(pants_count in 1usize..5, seed in any::<u64>()) {
        let combos = generate_combinations(&items("s", 7), &items("p", pants_count)).expect("non-empty input");
        let result = planner(seed).plan(&combos);
        let is_infeasible = matches!(
            result,
            Err(WardrobeError::NoFeasiblePlanFound { best_partial, .. }) if best_partial == pants_count
        );
        prop_assert!(is_infeasible);
    }
}
