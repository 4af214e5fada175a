//! One adapter per target table

use engage_core::entities::TargetKind;

use super::CounterTable;

/// Counters on `articles`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleCounters;

impl CounterTable for ArticleCounters {
    const KIND: TargetKind = TargetKind::Article;
    const TABLE: &'static str = "articles";
}

/// Counters on `business`
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessCounters;

impl CounterTable for BusinessCounters {
    const KIND: TargetKind = TargetKind::Business;
    const TABLE: &'static str = "business";
}

/// Counters on `profession`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfessionalCounters;

impl CounterTable for ProfessionalCounters {
    const KIND: TargetKind = TargetKind::Professional;
    const TABLE: &'static str = "profession";
}

/// Counters on `events`
#[derive(Debug, Clone, Copy, Default)]
pub struct EventCounters;

impl CounterTable for EventCounters {
    const KIND: TargetKind = TargetKind::Event;
    const TABLE: &'static str = "events";
}
