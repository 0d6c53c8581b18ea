//! Shared join steps: indexing, filtering, link resolution, week ordering.
//!
//! Both layouts start from the same list of [`EventPlacement`]s and the
//! same week ordering; they differ only in how placements become rows.

use std::collections::{HashMap, HashSet};

use crate::dates::{week_day_numbers, DayCode};
use crate::field::FieldRef;
use crate::record::Record;
use crate::types::RecordId;

use super::{GridFilters, GridInput, WeekInfo};

/// An event that survived filtering, with its links resolved.
#[derive(Debug, Clone)]
pub(crate) struct EventPlacement<'a> {
    pub event: &'a Record,
    /// Weeks the event is linked to and that exist, in link order.
    pub weeks: Vec<RecordId>,
    /// Positions in the bloc vocabulary, ascending, deduplicated.
    pub blocs: Vec<usize>,
    /// Active days indexed by [`DayCode::offset`].
    pub days: [bool; 7],
}

impl EventPlacement<'_> {
    pub fn has_bloc(&self, position: usize) -> bool {
        self.blocs.binary_search(&position).is_ok()
    }

    pub fn active_days(&self) -> Vec<DayCode> {
        DayCode::ALL
            .into_iter()
            .filter(|c| self.days[c.offset()])
            .collect()
    }
}

/// Whether `event` links to `selected` through `field`.
///
/// An inactive filter (no selection) always passes. A selection made
/// while the field slot is empty cannot be evaluated and is ignored.
fn link_filter_passes(event: &Record, field: Option<&FieldRef>, selected: Option<&RecordId>) -> bool {
    let Some(selected) = selected else {
        return true;
    };
    let Some(field) = field else {
        tracing::debug!(selected = %selected, "Link filter selected without a field; ignored");
        return true;
    };
    field.linked_ids(event).iter().any(|id| id == selected)
}

/// Site filter, then canal filter. The two are independent predicates so
/// the order does not change the surviving set.
pub(crate) fn passes_filters(event: &Record, input: &GridInput<'_>, filters: &GridFilters) -> bool {
    link_filter_passes(event, input.fields.site_links.as_ref(), filters.site.as_ref())
        && link_filter_passes(event, input.fields.canal_links.as_ref(), filters.canal.as_ref())
}

/// Resolve active days from the multi-select option names.
pub(crate) fn resolve_days(event: &Record, field: &FieldRef) -> [bool; 7] {
    let mut days = [false; 7];
    for name in field.option_names(event) {
        match DayCode::parse(&name) {
            Some(code) => days[code.offset()] = true,
            None => tracing::debug!(event_id = %event.id, option = %name, "Unknown day option"),
        }
    }
    days
}

/// Apply filters and resolve links for every event.
///
/// Events left without a resolvable week or a recognized bloc are dropped
/// here.
pub(crate) fn place_events<'a>(
    input: &GridInput<'a>,
    filters: &GridFilters,
) -> Vec<EventPlacement<'a>> {
    let week_ids: HashSet<&RecordId> = input.weeks.iter().map(|w| &w.id).collect();
    let bloc_names: HashMap<&RecordId, &str> = input
        .blocs
        .iter()
        .map(|b| (&b.id, b.name.as_str()))
        .collect();

    let mut placements = Vec::new();

    for event in input.events {
        if !passes_filters(event, input, filters) {
            continue;
        }

        let mut weeks: Vec<RecordId> = Vec::new();
        for id in input.fields.week_links.linked_ids(event) {
            if !week_ids.contains(&id) {
                continue;
            }
            if filters.week.as_ref().is_some_and(|w| *w != id) {
                continue;
            }
            if !weeks.contains(&id) {
                weeks.push(id);
            }
        }

        let mut blocs: Vec<usize> = Vec::new();
        for id in input.fields.bloc_links.linked_ids(event) {
            let Some(name) = bloc_names.get(&id).copied() else {
                continue;
            };
            match input.vocabulary.position(name) {
                Some(pos) => blocs.push(pos),
                None => {
                    tracing::debug!(event_id = %event.id, bloc = %name, "Unrecognized bloc dropped")
                }
            }
        }
        blocs.sort_unstable();
        blocs.dedup();

        if weeks.is_empty() || blocs.is_empty() {
            tracing::debug!(
                event_id = %event.id,
                weeks = weeks.len(),
                blocs = blocs.len(),
                "Event dropped: no resolvable week or recognized bloc",
            );
            continue;
        }

        placements.push(EventPlacement {
            event,
            weeks,
            blocs,
            days: resolve_days(event, &input.fields.active_days),
        });
    }

    placements
}

/// Weeks in display order: ascending start date, undated weeks last,
/// ties kept in table order.
pub(crate) fn ordered_weeks(input: &GridInput<'_>) -> Vec<WeekInfo> {
    let mut weeks: Vec<WeekInfo> = input
        .weeks
        .iter()
        .map(|w| {
            let start = input.fields.week_start.date(w);
            WeekInfo {
                id: w.id.clone(),
                name: w.name.clone(),
                start,
                end: input.fields.week_end.as_ref().and_then(|f| f.date(w)),
                day_numbers: week_day_numbers(start),
            }
        })
        .collect();
    sort_weeks(&mut weeks);
    weeks
}

/// Stable sort by start date with `None` after every dated week.
pub(crate) fn sort_weeks(weeks: &mut [WeekInfo]) {
    weeks.sort_by_key(|w| (w.start.is_none(), w.start));
}
