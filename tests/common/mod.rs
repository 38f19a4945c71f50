#![allow(dead_code)]

use std::sync::Arc;

use diesel::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lexicon_trainer::data::models::{MemberRole, MemberStatus, NodeType};
use lexicon_trainer::data::repositories::{CatalogRepository, TrainingRepository};
use lexicon_trainer::db::{DbPool, in_memory_pool};
use lexicon_trainer::features::training::TrainingInteractor;
use lexicon_trainer::schema::{
    expressions, group_members, groups, node_expressions, node_translations, nodes,
    transcriptions, translation_transcriptions, translations,
};

pub const OWNER: i32 = 1;
pub const READER: i32 = 2;
pub const PENDING: i32 = 3;
pub const OUTSIDER: i32 = 4;

pub const FOLDER: i32 = 10;
/// Expressions 1..=14.
pub const NUMBERS: i32 = 11;
/// Expressions 8..=20, overlapping `NUMBERS` on 8..=14.
pub const MORE_NUMBERS: i32 = 12;
/// Slice without expressions.
pub const EMPTY_SLICE: i32 = 13;
/// Slice in a group nobody above belongs to.
pub const FOREIGN_SLICE: i32 = 99;

pub const ROMANIZATION: i32 = 1;
pub const PHONETIC: i32 = 2;

pub struct TestApp {
    pub pool: DbPool,
    pub interactor: Arc<TrainingInteractor>,
}

pub fn test_app(seed: u64) -> TestApp {
    let pool = in_memory_pool().unwrap();
    seed_catalog(&pool);

    let catalog = Arc::new(CatalogRepository::new(pool.clone()));
    let registry = Arc::new(TrainingRepository::new(pool.clone()));
    let interactor = Arc::new(TrainingInteractor::with_rng(
        registry,
        catalog.clone(),
        catalog,
        StdRng::seed_from_u64(seed),
    ));

    TestApp { pool, interactor }
}

fn seed_catalog(pool: &DbPool) {
    let mut conn = pool.get().unwrap();

    diesel::insert_into(groups::table)
        .values(&vec![
            (groups::group_id.eq(1), groups::name.eq("Numbers")),
            (groups::group_id.eq(2), groups::name.eq("Someone else's")),
        ])
        .execute(&mut conn)
        .unwrap();

    let member = |user_id: i32, role: MemberRole, status: MemberStatus| {
        (
            group_members::group_id.eq(1),
            group_members::user_id.eq(user_id),
            group_members::role.eq(role.code()),
            group_members::status.eq(status.code()),
        )
    };
    diesel::insert_into(group_members::table)
        .values(&vec![
            member(OWNER, MemberRole::Admin, MemberStatus::Active),
            member(READER, MemberRole::Reader, MemberStatus::Active),
            member(PENDING, MemberRole::Editor, MemberStatus::Pending),
        ])
        .execute(&mut conn)
        .unwrap();

    let node = |node_id: i32, group_id: i32, node_type: NodeType, name: &'static str| {
        (
            nodes::node_id.eq(node_id),
            nodes::group_id.eq(group_id),
            nodes::node_type.eq(node_type.code()),
            nodes::name.eq(name),
        )
    };
    diesel::insert_into(nodes::table)
        .values(&vec![
            node(FOLDER, 1, NodeType::Folder, "All numbers"),
            node(NUMBERS, 1, NodeType::Slice, "One to fourteen"),
            node(MORE_NUMBERS, 1, NodeType::Slice, "Eight to twenty"),
            node(EMPTY_SLICE, 1, NodeType::Slice, "Nothing yet"),
            node(FOREIGN_SLICE, 2, NodeType::Slice, "Private"),
        ])
        .execute(&mut conn)
        .unwrap();

    let words: Vec<_> = (1..=20)
        .map(|id| {
            (
                expressions::expression_id.eq(id),
                expressions::value.eq(format!("numero {id}")),
            )
        })
        .chain([101, 102, 103].into_iter().map(|id| {
            (
                expressions::expression_id.eq(id),
                expressions::value.eq(format!("target {id}")),
            )
        }))
        .collect();
    diesel::insert_into(expressions::table)
        .values(&words)
        .execute(&mut conn)
        .unwrap();

    let attached: Vec<_> = (1..=14)
        .map(|id| (NUMBERS, id))
        .chain((8..=20).map(|id| (MORE_NUMBERS, id)))
        .chain([(FOREIGN_SLICE, 1)])
        .map(|(node_id, expression_id)| {
            (
                node_expressions::node_id.eq(node_id),
                node_expressions::expression_id.eq(expression_id),
            )
        })
        .collect();
    diesel::insert_into(node_expressions::table)
        .values(&attached)
        .execute(&mut conn)
        .unwrap();

    // Expression 1 translates to 101 in NUMBERS, 102 in MORE_NUMBERS and 103
    // only in the foreign slice.
    diesel::insert_into(translations::table)
        .values(&vec![
            (
                translations::translation_id.eq(1),
                translations::native_id.eq(1),
                translations::target_id.eq(101),
            ),
            (
                translations::translation_id.eq(2),
                translations::native_id.eq(1),
                translations::target_id.eq(102),
            ),
            (
                translations::translation_id.eq(3),
                translations::native_id.eq(1),
                translations::target_id.eq(103),
            ),
        ])
        .execute(&mut conn)
        .unwrap();

    diesel::insert_into(node_translations::table)
        .values(&vec![
            (node_translations::node_id.eq(NUMBERS), node_translations::translation_id.eq(1)),
            (node_translations::node_id.eq(MORE_NUMBERS), node_translations::translation_id.eq(2)),
            (node_translations::node_id.eq(FOREIGN_SLICE), node_translations::translation_id.eq(3)),
        ])
        .execute(&mut conn)
        .unwrap();

    let transcription = |id: i32, kind: i32, value: &'static str| {
        (
            transcriptions::transcription_id.eq(id),
            transcriptions::transcription_type.eq(kind),
            transcriptions::value.eq(value),
        )
    };
    diesel::insert_into(transcriptions::table)
        .values(&vec![
            transcription(1, ROMANIZATION, "wan"),
            transcription(2, ROMANIZATION, "uno"),
            transcription(3, PHONETIC, "/wʌn/"),
        ])
        .execute(&mut conn)
        .unwrap();

    diesel::insert_into(translation_transcriptions::table)
        .values(&vec![
            (
                translation_transcriptions::translation_id.eq(1),
                translation_transcriptions::transcription_id.eq(1),
            ),
            (
                translation_transcriptions::translation_id.eq(2),
                translation_transcriptions::transcription_id.eq(2),
            ),
            (
                translation_transcriptions::translation_id.eq(1),
                translation_transcriptions::transcription_id.eq(3),
            ),
        ])
        .execute(&mut conn)
        .unwrap();
}
