//! 每週穿搭規劃
//!
//! 從「喜歡」的組合中挑出 7 套，上衣不重複、褲子也不重複。
//! 做法是隨機重排 + 回溯搜尋：每次嘗試先打亂候選順序，再沿著該順序往前掃描、
//! 深度優先地挑選，走不通就撤銷上一個選擇。找到第一組 7 套就立即回傳。
//!
//! 搜尋前先以二分圖最大配對算出最多能排幾天；不足 7 天直接回報無解，不進入搜尋。
//! 每次嘗試都有步數上限，總嘗試次數也有上限，所以任何輸入都保證會結束。

use crate::domain::model::{Combination, Preferences, WeeklyPlan, WEEK_LENGTH};
use crate::utils::error::{Result, WardrobeError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;
pub const DEFAULT_MAX_STEPS_PER_ATTEMPT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub max_attempts: usize,
    /// 單次嘗試最多檢查的候選數
    pub max_steps_per_attempt: usize,
    /// 固定種子 (測試或需要可重現結果時使用)
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_steps_per_attempt: DEFAULT_MAX_STEPS_PER_ATTEMPT,
            seed: None,
        }
    }
}

/// 依目錄順序取出偏好為 `true` 的組合；沒有紀錄或不喜歡的都排除
pub fn liked_combinations(
    combinations: &[Combination],
    preferences: &Preferences,
) -> Vec<Combination> {
    combinations
        .iter()
        .filter(|c| preferences.get(&c.id).copied().unwrap_or(false))
        .cloned()
        .collect()
}

pub struct WeeklyPlanner {
    config: PlannerConfig,
    rng: StdRng,
}

impl WeeklyPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&mut self, liked: &[Combination]) -> Result<WeeklyPlan> {
        if liked.len() < WEEK_LENGTH {
            return Err(WardrobeError::InsufficientLikedCombinations { count: liked.len() });
        }

        let reachable = max_disjoint_outfits(liked, WEEK_LENGTH);
        if reachable < WEEK_LENGTH {
            tracing::info!(
                "No disjoint week exists among {} liked combinations (at most {} outfits)",
                liked.len(),
                reachable
            );
            return Err(WardrobeError::NoFeasiblePlanFound {
                attempts: 0,
                best_partial: reachable,
            });
        }

        let mut order: Vec<usize> = (0..liked.len()).collect();
        let mut best_partial = 0;

        for attempt in 1..=self.config.max_attempts {
            order.shuffle(&mut self.rng);

            let mut ctx = SearchContext::new(liked, &order, self.config.max_steps_per_attempt);
            let outcome = ctx.search(0);
            best_partial = best_partial.max(ctx.deepest);

            match outcome {
                SearchOutcome::Found => {
                    tracing::info!(
                        "🗓️ Weekly plan found on attempt {} ({} steps, {} liked combinations)",
                        attempt,
                        ctx.steps,
                        liked.len()
                    );
                    return WeeklyPlan::new(ctx.into_outfits());
                }
                SearchOutcome::Exhausted => {
                    // 完整走完一個排列等於檢查過所有子集合，再換順序也不會有解
                    tracing::debug!(
                        "Attempt {} exhausted the search space (deepest {})",
                        attempt,
                        ctx.deepest
                    );
                    return Err(WardrobeError::NoFeasiblePlanFound {
                        attempts: attempt,
                        best_partial,
                    });
                }
                SearchOutcome::StepLimit => {
                    tracing::debug!(
                        "Attempt {} hit the step ceiling of {} (deepest {})",
                        attempt,
                        self.config.max_steps_per_attempt,
                        ctx.deepest
                    );
                }
            }
        }

        tracing::warn!(
            "No weekly plan after {} attempts, best partial plan had {} outfits",
            self.config.max_attempts,
            best_partial
        );
        Err(WardrobeError::NoFeasiblePlanFound {
            attempts: self.config.max_attempts,
            best_partial,
        })
    }
}

/// 上衣與褲子之間最多能湊出幾套互不重複的組合 (增廣路徑法)，算到 `limit` 為止
fn max_disjoint_outfits(liked: &[Combination], limit: usize) -> usize {
    let mut shirt_index: HashMap<&str, usize> = HashMap::new();
    let mut pants_index: HashMap<&str, usize> = HashMap::new();
    let mut adjacency: Vec<Vec<usize>> = Vec::new();

    for combo in liked {
        let next = shirt_index.len();
        let shirt = *shirt_index.entry(combo.shirt_id()).or_insert(next);
        if shirt == adjacency.len() {
            adjacency.push(Vec::new());
        }
        let next = pants_index.len();
        let pants = *pants_index.entry(combo.pants_id()).or_insert(next);
        adjacency[shirt].push(pants);
    }

    let mut pants_owner: Vec<Option<usize>> = vec![None; pants_index.len()];
    let mut matched = 0;
    for shirt in 0..adjacency.len() {
        if matched >= limit {
            break;
        }
        let mut visited = vec![false; pants_owner.len()];
        if augment(shirt, &adjacency, &mut pants_owner, &mut visited) {
            matched += 1;
        }
    }
    matched
}

fn augment(
    shirt: usize,
    adjacency: &[Vec<usize>],
    pants_owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &pants in &adjacency[shirt] {
        if visited[pants] {
            continue;
        }
        visited[pants] = true;

        let free = match pants_owner[pants] {
            None => true,
            Some(owner) => augment(owner, adjacency, pants_owner, visited),
        };
        if free {
            pants_owner[pants] = Some(shirt);
            return true;
        }
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Found,
    Exhausted,
    StepLimit,
}

/// 單次嘗試的搜尋狀態；回溯時明確地撤銷選擇
struct SearchContext<'a> {
    liked: &'a [Combination],
    order: &'a [usize],
    /// 已選組合在 `order` 中的位置
    partial: Vec<usize>,
    used_shirts: HashSet<&'a str>,
    used_pants: HashSet<&'a str>,
    steps: usize,
    max_steps: usize,
    deepest: usize,
}

impl<'a> SearchContext<'a> {
    fn new(liked: &'a [Combination], order: &'a [usize], max_steps: usize) -> Self {
        Self {
            liked,
            order,
            partial: Vec::with_capacity(WEEK_LENGTH),
            used_shirts: HashSet::with_capacity(WEEK_LENGTH),
            used_pants: HashSet::with_capacity(WEEK_LENGTH),
            steps: 0,
            max_steps,
            deepest: 0,
        }
    }

    fn search(&mut self, start: usize) -> SearchOutcome {
        if self.partial.len() == WEEK_LENGTH {
            return SearchOutcome::Found;
        }

        let liked = self.liked;
        let order = self.order;

        for pos in start..order.len() {
            if self.steps >= self.max_steps {
                return SearchOutcome::StepLimit;
            }
            self.steps += 1;

            let combo = &liked[order[pos]];
            if self.used_shirts.contains(combo.shirt_id())
                || self.used_pants.contains(combo.pants_id())
            {
                continue;
            }

            self.choose(pos, combo);
            match self.search(pos + 1) {
                SearchOutcome::Exhausted => self.undo(combo),
                outcome => return outcome,
            }
        }

        SearchOutcome::Exhausted
    }

    fn choose(&mut self, pos: usize, combo: &'a Combination) {
        self.partial.push(pos);
        self.used_shirts.insert(combo.shirt_id());
        self.used_pants.insert(combo.pants_id());
        self.deepest = self.deepest.max(self.partial.len());
    }

    fn undo(&mut self, combo: &'a Combination) {
        self.partial.pop();
        self.used_shirts.remove(combo.shirt_id());
        self.used_pants.remove(combo.pants_id());
    }

    fn into_outfits(self) -> Vec<Combination> {
        self.partial
            .iter()
            .map(|&pos| self.liked[self.order[pos]].clone())
            .collect()
    }
}
