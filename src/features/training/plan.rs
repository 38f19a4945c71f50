//! Plan builders: turn a vocabulary pool into staged, cycled training items.
//!
//! `Direct` is a single pass with every item in stage 1, cycle 1. `Cycles`
//! replays the whole pool once per stage, reshuffled each time, and cuts each
//! stage into batches ("cycles") that shrink as the stage number grows.

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::data::models::{PlannedItem, PoolEntry, TrainingType};

/// Smallest number of items per cycle at the coarsest stage.
pub const MIN_CHUNK_SIZE: usize = 7;

pub trait PlanStrategy: Send + Sync {
    fn plan(&self, pool: &[PoolEntry], rng: &mut dyn RngCore) -> Vec<PlannedItem>;
}

pub struct DirectPlan;

pub struct CyclesPlan {
    pub min_chunk_size: usize,
}

static DIRECT_PLAN: DirectPlan = DirectPlan;
static CYCLES_PLAN: CyclesPlan = CyclesPlan {
    min_chunk_size: MIN_CHUNK_SIZE,
};

impl TrainingType {
    pub fn strategy(self) -> &'static dyn PlanStrategy {
        match self {
            TrainingType::Direct => &DIRECT_PLAN,
            TrainingType::Cycles => &CYCLES_PLAN,
        }
    }
}

impl PlanStrategy for DirectPlan {
    fn plan(&self, pool: &[PoolEntry], _rng: &mut dyn RngCore) -> Vec<PlannedItem> {
        pool.iter()
            .map(|entry| PlannedItem {
                expression_id: entry.id,
                stage: 1,
                cycle: 1,
            })
            .collect()
    }
}

impl PlanStrategy for CyclesPlan {
    fn plan(&self, pool: &[PoolEntry], rng: &mut dyn RngCore) -> Vec<PlannedItem> {
        let total = pool.len();
        if total == 0 {
            return Vec::new();
        }

        let stages = stage_count(total, self.min_chunk_size);
        let mut items = Vec::with_capacity(total * stages as usize);
        let mut order: Vec<_> = pool.iter().map(|entry| entry.id).collect();

        for stage in 1..=stages {
            order.shuffle(&mut *rng);
            let chunk = chunk_size(total, self.min_chunk_size, stage);

            items.extend(order.iter().enumerate().map(|(position, &expression_id)| {
                PlannedItem {
                    expression_id,
                    stage,
                    cycle: cycle_of(position, chunk),
                }
            }));
        }

        items
    }
}

/// `round(log2(total / min_chunk_size))`, never below one stage.
pub fn stage_count(total: usize, min_chunk_size: usize) -> u32 {
    if total == 0 || min_chunk_size == 0 {
        return 1;
    }

    let stages = (total as f64 / min_chunk_size as f64).log2().round();
    if stages < 1.0 { 1 } else { stages as u32 }
}

/// Items per cycle for `stage`.
pub fn chunk_size(total: usize, min_chunk_size: usize, stage: u32) -> usize {
    if total == 0 {
        return 1;
    }

    let divisor = min_chunk_size.max(1) as f64 * 2f64.powi(stage as i32);
    let rate = (total as f64 / divisor).round().max(1.0);
    let cycle_count = ((total as f64 / rate).round() as usize).max(1);

    total.div_ceil(cycle_count)
}

fn cycle_of(position: usize, chunk: usize) -> u32 {
    (position as f64 / chunk as f64).round() as u32
}
