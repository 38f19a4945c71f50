use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{
    ItemId, NewTraining, NewTrainingItemRow, NewTrainingRow, NodeId, Training, TrainingId,
    TrainingItem, TrainingItemRow, TrainingMeta, TrainingRow, TrainingType, TranscriptionTypeId,
    UserId,
};
use crate::db::DbPool;
use crate::features::training::{Result, TrainingError, TrainingRegistry};
use crate::schema::{expressions, training_items, trainings};

/// Keeps each multi-row insert under SQLite's bound parameter limit.
const ITEM_INSERT_BATCH: usize = 150;

pub struct TrainingRepository {
    pool: DbPool,
}

impl TrainingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn meta(conn: &mut SqliteConnection, training_id: TrainingId) -> Result<TrainingMeta> {
        let unique_item_count = training_items::table
            .filter(training_items::training_id.eq(training_id))
            .filter(training_items::stage.eq(1))
            .count()
            .get_result::<i64>(conn)?;

        let complete_count = training_items::table
            .filter(training_items::training_id.eq(training_id))
            .filter(training_items::complete.eq(true))
            .count()
            .get_result::<i64>(conn)?;

        let stages = training_items::table
            .filter(training_items::training_id.eq(training_id))
            .select(training_items::stage)
            .distinct()
            .load::<i32>(conn)?;

        Ok(TrainingMeta {
            stage_count: stages.len() as u32,
            unique_item_count: unique_item_count as u32,
            complete_count: complete_count as u32,
        })
    }

    fn hydrate(conn: &mut SqliteConnection, row: TrainingRow) -> Result<Training> {
        let kind = TrainingType::from_code(row.training_type).ok_or_else(|| {
            TrainingError::CorruptData(format!(
                "training {} has unknown type {}",
                row.training_id, row.training_type
            ))
        })?;
        let scope = decode_scope(&row.scope)?;
        let meta = Self::meta(conn, row.training_id)?;

        Ok(Training {
            id: row.training_id,
            owner_id: row.owner_id,
            kind,
            scope,
            transcription_type: row.transcription_type,
            meta,
            created_at: row.created_at,
        })
    }
}

pub fn encode_scope(scope: &[NodeId]) -> Result<String> {
    serde_json::to_string(scope)
        .map_err(|e| TrainingError::CorruptData(format!("unencodable scope: {e}")))
}

pub fn decode_scope(raw: &str) -> Result<Vec<NodeId>> {
    serde_json::from_str(raw)
        .map_err(|e| TrainingError::CorruptData(format!("stored scope {raw:?}: {e}")))
}

impl TrainingRegistry for TrainingRepository {
    fn find_existing(
        &self,
        owner_id: UserId,
        kind: TrainingType,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Option<Training>> {
        let mut conn = self.pool.get()?;
        let encoded = encode_scope(scope)?;

        let mut query = trainings::table
            .filter(trainings::owner_id.eq(owner_id))
            .filter(trainings::training_type.eq(kind.code()))
            .filter(trainings::scope.eq(encoded))
            .select(TrainingRow::as_select())
            .into_boxed();

        query = match transcription_type {
            Some(type_id) => query.filter(trainings::transcription_type.eq(type_id)),
            None => query.filter(trainings::transcription_type.is_null()),
        };

        let row = query.first(&mut conn).optional()?;

        row.map(|row| Self::hydrate(&mut conn, row)).transpose()
    }

    fn persist(&self, training: NewTraining) -> Result<Training> {
        if training.items.is_empty() {
            return Err(TrainingError::InvalidRequest(
                "a training needs at least one item".into(),
            ));
        }

        let mut conn = self.pool.get()?;
        let encoded = encode_scope(&training.scope)?;

        let training_id = conn.transaction::<_, TrainingError, _>(|conn| {
            diesel::insert_into(trainings::table)
                .values(&NewTrainingRow {
                    owner_id: training.owner_id,
                    training_type: training.kind.code(),
                    scope: &encoded,
                    transcription_type: training.transcription_type,
                    created_at: Utc::now().naive_utc(),
                })
                .execute(conn)?;

            let training_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            let rows: Vec<NewTrainingItemRow> = training
                .items
                .iter()
                .map(|item| NewTrainingItemRow {
                    training_id,
                    expression_id: item.expression_id,
                    stage: item.stage as i32,
                    cycle: item.cycle as i32,
                    complete: false,
                })
                .collect();

            for batch in rows.chunks(ITEM_INSERT_BATCH) {
                diesel::insert_into(training_items::table)
                    .values(batch)
                    .execute(conn)?;
            }

            Ok(training_id)
        })?;

        let row = trainings::table
            .find(training_id)
            .select(TrainingRow::as_select())
            .first(&mut conn)?;

        Self::hydrate(&mut conn, row)
    }

    fn get(&self, training_id: TrainingId) -> Result<Training> {
        let mut conn = self.pool.get()?;

        let row = trainings::table
            .find(training_id)
            .select(TrainingRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(TrainingError::NotFound("training"))?;

        Self::hydrate(&mut conn, row)
    }

    fn get_by_item(&self, item_id: ItemId) -> Result<Training> {
        let mut conn = self.pool.get()?;

        let row = trainings::table
            .inner_join(training_items::table)
            .filter(training_items::item_id.eq(item_id))
            .select(TrainingRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(TrainingError::NotFound("training item"))?;

        Self::hydrate(&mut conn, row)
    }

    fn list(&self, owner_id: UserId) -> Result<Vec<Training>> {
        let mut conn = self.pool.get()?;

        let rows = trainings::table
            .filter(trainings::owner_id.eq(owner_id))
            .order((trainings::created_at.desc(), trainings::training_id.desc()))
            .select(TrainingRow::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| Self::hydrate(&mut conn, row))
            .collect()
    }

    fn item(&self, item_id: ItemId) -> Result<TrainingItem> {
        let mut conn = self.pool.get()?;

        let (row, value) = training_items::table
            .left_join(expressions::table)
            .filter(training_items::item_id.eq(item_id))
            .select((TrainingItemRow::as_select(), expressions::value.nullable()))
            .first::<(TrainingItemRow, Option<String>)>(&mut conn)
            .optional()?
            .ok_or(TrainingError::NotFound("training item"))?;

        Ok(row.into_item(value))
    }

    fn incomplete_items(&self, training_id: TrainingId) -> Result<Vec<TrainingItem>> {
        let mut conn = self.pool.get()?;

        let rows = training_items::table
            .left_join(expressions::table)
            .filter(training_items::training_id.eq(training_id))
            .filter(training_items::complete.eq(false))
            .select((TrainingItemRow::as_select(), expressions::value.nullable()))
            .load::<(TrainingItemRow, Option<String>)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(row, value)| row.into_item(value))
            .collect())
    }

    fn reset(&self, training_id: TrainingId) -> Result<()> {
        let mut conn = self.pool.get()?;

        diesel::update(training_items::table.filter(training_items::training_id.eq(training_id)))
            .set(training_items::complete.eq(false))
            .execute(&mut conn)?;

        Ok(())
    }

    fn mark_complete(&self, item_id: ItemId) -> Result<()> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(training_items::table.find(item_id))
            .set(training_items::complete.eq(true))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(TrainingError::NotFound("training item"));
        }
        Ok(())
    }
}
