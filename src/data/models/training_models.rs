use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::{training_items, trainings};

pub type UserId = i32;
pub type NodeId = i32;
pub type ExpressionId = i32;
pub type TrainingId = i32;
pub type ItemId = i32;
pub type TranscriptionTypeId = i32;

/// How a training lays out its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingType {
    /// One flat pass over the pool.
    Direct,
    /// Several stages over the same pool, each split into smaller cycles.
    Cycles,
}

impl TrainingType {
    /// Integer code stored in `trainings.training_type`.
    pub fn code(self) -> i32 {
        match self {
            TrainingType::Direct => 0,
            TrainingType::Cycles => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TrainingType::Direct),
            1 => Some(TrainingType::Cycles),
            _ => None,
        }
    }
}

/// Aggregate progress, always derived from the item collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingMeta {
    pub stage_count: u32,
    pub unique_item_count: u32,
    pub complete_count: u32,
}

impl TrainingMeta {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a TrainingItem>,
    {
        let mut stages = Vec::new();
        let mut meta = TrainingMeta::default();

        for item in items {
            if !stages.contains(&item.stage) {
                stages.push(item.stage);
            }
            if item.stage == 1 {
                meta.unique_item_count += 1;
            }
            if item.complete {
                meta.complete_count += 1;
            }
        }

        meta.stage_count = stages.len() as u32;
        meta
    }

    /// Every stage replays the whole pool, so this is also the row count.
    pub fn item_count(&self) -> u32 {
        self.unique_item_count * self.stage_count
    }

    pub fn is_finished(&self) -> bool {
        self.item_count() > 0 && self.complete_count >= self.item_count()
    }
}

/// `TrainingMeta` as sent to clients, with the derived fields spelled out.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetaView {
    #[serde(flatten)]
    meta: TrainingMeta,
    item_count: u32,
    finished: bool,
}

fn serialize_meta<S>(meta: &TrainingMeta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    MetaView {
        meta: *meta,
        item_count: meta.item_count(),
        finished: meta.is_finished(),
    }
    .serialize(serializer)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: TrainingId,
    pub owner_id: UserId,
    #[serde(rename = "type")]
    pub kind: TrainingType,
    pub scope: Vec<NodeId>,
    /// Only transcriptions of this type are offered with answers.
    pub transcription_type: Option<TranscriptionTypeId>,
    #[serde(serialize_with = "serialize_meta")]
    pub meta: TrainingMeta,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingExpression {
    pub id: ExpressionId,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingItem {
    pub id: ItemId,
    pub training_id: TrainingId,
    pub expression_id: ExpressionId,
    pub stage: u32,
    pub cycle: u32,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<TrainingExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcription {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: TranscriptionTypeId,
    pub value: String,
}

/// One acceptable answer for a training item: a target-language expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingAnswer {
    pub id: ExpressionId,
    pub value: String,
    pub transcriptions: Vec<Transcription>,
}

/// A reviewable vocabulary entry reachable from a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolEntry {
    pub id: ExpressionId,
    pub value: String,
}

/// Stage/cycle assignment produced by a plan builder, before it has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedItem {
    pub expression_id: ExpressionId,
    pub stage: u32,
    pub cycle: u32,
}

/// A fully planned training waiting to be persisted.
#[derive(Debug, Clone)]
pub struct NewTraining {
    pub owner_id: UserId,
    pub kind: TrainingType,
    pub scope: Vec<NodeId>,
    pub transcription_type: Option<TranscriptionTypeId>,
    pub items: Vec<PlannedItem>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = trainings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrainingRow {
    pub training_id: i32,
    pub owner_id: i32,
    pub training_type: i32,
    pub scope: String,
    pub transcription_type: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = trainings)]
pub struct NewTrainingRow<'a> {
    pub owner_id: i32,
    pub training_type: i32,
    pub scope: &'a str,
    pub transcription_type: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = training_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrainingItemRow {
    pub item_id: i32,
    pub training_id: i32,
    pub expression_id: i32,
    pub stage: i32,
    pub cycle: i32,
    pub complete: bool,
}

#[derive(Insertable)]
#[diesel(table_name = training_items)]
pub struct NewTrainingItemRow {
    pub training_id: i32,
    pub expression_id: i32,
    pub stage: i32,
    pub cycle: i32,
    pub complete: bool,
}

impl TrainingItemRow {
    pub fn into_item(self, expression_value: Option<String>) -> TrainingItem {
        let expression = expression_value.map(|value| TrainingExpression {
            id: self.expression_id,
            value,
        });

        TrainingItem {
            id: self.item_id,
            training_id: self.training_id,
            expression_id: self.expression_id,
            stage: self.stage as u32,
            cycle: self.cycle as u32,
            complete: self.complete,
            expression,
        }
    }
}
