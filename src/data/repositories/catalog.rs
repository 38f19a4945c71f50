use std::collections::BTreeMap;

use diesel::prelude::*;

use crate::data::models::{
    ExpressionId, MemberRole, MemberStatus, Membership, NodeId, NodeType, PoolEntry,
    TrainingAnswer, Transcription, TranscriptionTypeId, UserId,
};
use crate::db::DbPool;
use crate::features::training::{MembershipSource, Result, VocabularySource};
use crate::schema::{
    expressions, group_members, node_expressions, node_translations, nodes, transcriptions,
    translation_transcriptions, translations,
};

/// Read side of the group/node/expression catalog.
pub struct CatalogRepository {
    pool: DbPool,
}

impl CatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Transcriptions of the given translations, keyed by translation id.
    fn transcriptions_of(
        conn: &mut SqliteConnection,
        translation_ids: &[i32],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Vec<(i32, Transcription)>> {
        let mut query = translation_transcriptions::table
            .inner_join(transcriptions::table)
            .filter(translation_transcriptions::translation_id.eq_any(translation_ids))
            .order(transcriptions::transcription_id)
            .select((
                translation_transcriptions::translation_id,
                transcriptions::transcription_id,
                transcriptions::transcription_type,
                transcriptions::value,
            ))
            .into_boxed();

        if let Some(type_id) = transcription_type {
            query = query.filter(transcriptions::transcription_type.eq(type_id));
        }

        let rows = query.load::<(i32, i32, i32, String)>(conn)?;

        Ok(rows
            .into_iter()
            .map(|(translation_id, id, kind, value)| {
                (translation_id, Transcription { id, kind, value })
            })
            .collect())
    }
}

impl VocabularySource for CatalogRepository {
    fn resolve_scope(&self, raw_ids: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut conn = self.pool.get()?;

        let mut scope = nodes::table
            .filter(nodes::node_id.eq_any(raw_ids))
            .filter(nodes::node_type.eq(NodeType::Slice.code()))
            .select(nodes::node_id)
            .load::<i32>(&mut conn)?;

        scope.sort_unstable();
        scope.dedup();
        Ok(scope)
    }

    fn pool(&self, scope: &[NodeId]) -> Result<Vec<PoolEntry>> {
        let mut conn = self.pool.get()?;

        let rows = node_expressions::table
            .inner_join(expressions::table)
            .filter(node_expressions::node_id.eq_any(scope))
            .select((expressions::expression_id, expressions::value))
            .distinct()
            .order(expressions::expression_id)
            .load::<(i32, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, value)| PoolEntry { id, value })
            .collect())
    }

    fn translations_for(
        &self,
        expression_id: ExpressionId,
        scope: &[NodeId],
        transcription_type: Option<TranscriptionTypeId>,
    ) -> Result<Vec<TrainingAnswer>> {
        let mut conn = self.pool.get()?;

        let rows = translations::table
            .inner_join(expressions::table)
            .inner_join(node_translations::table)
            .filter(translations::native_id.eq(expression_id))
            .filter(node_translations::node_id.eq_any(scope))
            .select((
                translations::translation_id,
                expressions::expression_id,
                expressions::value,
            ))
            .distinct()
            .load::<(i32, i32, String)>(&mut conn)?;

        // Several translations can point at the same target expression.
        let mut answers: BTreeMap<ExpressionId, (TrainingAnswer, Vec<i32>)> = BTreeMap::new();
        for (translation_id, target_id, value) in rows {
            let (_, translation_ids) = answers.entry(target_id).or_insert_with(|| {
                (
                    TrainingAnswer {
                        id: target_id,
                        value,
                        transcriptions: Vec::new(),
                    },
                    Vec::new(),
                )
            });
            translation_ids.push(translation_id);
        }

        let all_ids: Vec<i32> = answers.values().flat_map(|(_, ids)| ids.clone()).collect();
        let found = Self::transcriptions_of(&mut conn, &all_ids, transcription_type)?;

        Ok(answers
            .into_values()
            .map(|(mut answer, ids)| {
                for (translation_id, transcription) in &found {
                    if ids.contains(translation_id)
                        && !answer.transcriptions.iter().any(|t| t.id == transcription.id)
                    {
                        answer.transcriptions.push(transcription.clone());
                    }
                }
                answer
            })
            .collect())
    }
}

impl MembershipSource for CatalogRepository {
    fn membership(&self, user_id: UserId, node_id: NodeId) -> Result<Option<Membership>> {
        let mut conn = self.pool.get()?;

        let Some(group_id) = nodes::table
            .find(node_id)
            .select(nodes::group_id)
            .first::<i32>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let codes = group_members::table
            .find((group_id, user_id))
            .select((group_members::role, group_members::status))
            .first::<(i32, i32)>(&mut conn)
            .optional()?;

        Ok(codes.and_then(|(role, status)| {
            match (MemberRole::from_code(role), MemberStatus::from_code(status)) {
                (Some(role), Some(status)) => Some(Membership { role, status }),
                _ => {
                    log::warn!(
                        "Ignoring membership of user {} in group {} with unknown codes ({}, {})",
                        user_id,
                        group_id,
                        role,
                        status
                    );
                    None
                }
            }
        }))
    }
}
