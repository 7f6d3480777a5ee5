//! Load-time integrity checks.
//!
//! Every row must define all seven methods, each as a two-element pair of
//! categories in 1..=4 or `null`. The first violation aborts construction.

use std::collections::HashSet;

use crate::category::{Category, CategoryPair, Rating};
use crate::condition::{ConditionId, ConditionInfo, ConditionRecord};
use crate::error::IntegrityError;
use crate::method::Method;
use crate::table::source::ConditionSource;

fn column_method(column: &str) -> Option<Method> {
    Method::ALL.into_iter().find(|m| m.code() == column)
}

fn parse_rating(
    condition: &ConditionId,
    method: Method,
    value: Option<i64>,
) -> Result<Rating, IntegrityError> {
    let Some(value) = value else {
        return Ok(Rating::NotApplicable);
    };
    Category::try_from(value)
        .map(Rating::Category)
        .map_err(|_| IntegrityError::CategoryOutOfRange {
            condition: condition.to_string(),
            method,
            value,
        })
}

fn parse_pair(
    condition: &ConditionId,
    method: Method,
    values: Option<&[Option<i64>]>,
) -> Result<CategoryPair, IntegrityError> {
    let Some(values) = values else {
        return Ok(CategoryPair::NOT_APPLICABLE);
    };
    let [initiation, continuation] = values else {
        return Err(IntegrityError::MalformedPair {
            condition: condition.to_string(),
            method,
            len: values.len(),
        });
    };
    Ok(CategoryPair::new(
        parse_rating(condition, method, *initiation)?,
        parse_rating(condition, method, *continuation)?,
    ))
}

fn build_record(source: ConditionSource) -> Result<ConditionRecord, IntegrityError> {
    let id = ConditionId::new(source.id.as_str()).map_err(|e| IntegrityError::InvalidConditionId {
        condition: source.id.clone(),
        reason: e.to_string(),
    })?;

    let label = source.label.trim();
    if label.is_empty() {
        return Err(IntegrityError::EmptyLabel {
            condition: id.to_string(),
        });
    }

    if let Some(column) = source.ratings.keys().find(|c| column_method(c).is_none()) {
        return Err(IntegrityError::UnknownMethodColumn {
            condition: id.to_string(),
            column: column.clone(),
        });
    }

    let mut pairs = [CategoryPair::NOT_APPLICABLE; Method::COUNT];
    for method in Method::ALL {
        let Some(values) = source.ratings.get(method.code()) else {
            return Err(IntegrityError::MissingMethod {
                condition: id.to_string(),
                method,
            });
        };
        pairs[method.index()] = parse_pair(&id, method, values.as_deref())?;
    }

    let review = source
        .review
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());

    Ok(ConditionRecord::new(
        ConditionInfo {
            id,
            label: label.to_string(),
            group: source.group,
        },
        pairs,
        review,
    ))
}

/// Validates raw rows and converts them into records, preserving order.
pub(crate) fn build_records(
    sources: Vec<ConditionSource>,
) -> Result<Vec<ConditionRecord>, IntegrityError> {
    if sources.is_empty() {
        return Err(IntegrityError::EmptyTable);
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(sources.len());
    let mut records = Vec::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source.id.clone()) {
            return Err(IntegrityError::DuplicateCondition {
                condition: source.id,
            });
        }
        records.push(build_record(source)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionGroup;

    fn row(id: &str) -> ConditionSource {
        ConditionSource::new(id, "Test row", ConditionGroup::Cardiovascular).uniform(1)
    }

    #[test]
    fn builds_complete_rows() {
        let records = build_records(vec![row("A"), row("B")]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id().as_str(), "A");
        assert_eq!(records[1].id().as_str(), "B");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(build_records(Vec::new()), Err(IntegrityError::EmptyTable));
    }

    #[test]
    fn rejects_missing_method() {
        let err = build_records(vec![row("A").without(Method::Pop)]).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::MissingMethod {
                condition: "A".to_string(),
                method: Method::Pop,
            }
        );
    }

    #[test]
    fn null_pair_is_not_applicable() {
        let records = build_records(vec![row("A").not_applicable(Method::Implant)]).unwrap();
        assert!(records[0].pair(Method::Implant).is_inapplicable());
        assert!(!records[0].pair(Method::CuIud).is_inapplicable());
    }

    #[test]
    fn rejects_out_of_range_category() {
        let err = build_records(vec![row("A").rating(Method::Chc, Some(5), Some(4))]).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::CategoryOutOfRange { method: Method::Chc, value: 5, .. }
        ));

        let err = build_records(vec![row("A").rating(Method::Chc, Some(2), Some(0))]).unwrap_err();
        assert!(matches!(err, IntegrityError::CategoryOutOfRange { value: 0, .. }));
    }

    #[test]
    fn rejects_malformed_pair() {
        let mut source = row("A");
        source
            .ratings
            .insert("dmpa".to_string(), Some(vec![Some(1), Some(1), Some(1)]));
        let err = build_records(vec![source]).unwrap_err();
        assert!(matches!(err, IntegrityError::MalformedPair { len: 3, .. }));
    }

    #[test]
    fn rejects_unknown_column() {
        let mut source = row("A");
        source.ratings.insert("patch".to_string(), Some(vec![Some(1), Some(1)]));
        let err = build_records(vec![source]).unwrap_err();
        assert!(matches!(err, IntegrityError::UnknownMethodColumn { .. }));
    }

    #[test]
    fn rejects_duplicates_and_bad_ids() {
        let err = build_records(vec![row("A"), row("A")]).unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateCondition { .. }));

        let err = build_records(vec![row("not-valid")]).unwrap_err();
        assert!(matches!(err, IntegrityError::InvalidConditionId { .. }));
    }

    #[test]
    fn rejects_empty_label() {
        let source = ConditionSource::new("A", "  ", ConditionGroup::Smoking).uniform(1);
        let err = build_records(vec![source]).unwrap_err();
        assert!(matches!(err, IntegrityError::EmptyLabel { .. }));
    }

    #[test]
    fn keeps_asymmetric_pairs_as_given() {
        let records =
            build_records(vec![row("A").rating(Method::CuIud, Some(4), Some(2))]).unwrap();
        let pair = records[0].pair(Method::CuIud);
        assert_eq!(pair.initiation, Rating::Category(Category::Four));
        assert_eq!(pair.continuation, Rating::Category(Category::Two));
    }

    #[test]
    fn blank_review_note_is_dropped() {
        let records = build_records(vec![row("A").review("   ")]).unwrap();
        assert!(records[0].review_note().is_none());
    }
}
