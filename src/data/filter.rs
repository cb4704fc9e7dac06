use std::collections::{BTreeMap, BTreeSet};

use super::model::{CatalogDataset, FieldValue, FilterField, Idol};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per field
// ---------------------------------------------------------------------------

/// Per-field selection state: maps field → set of selected values.
/// If a field is absent or its set is empty, it means "no filter" (show all).
pub type FilterState = BTreeMap<FilterField, BTreeSet<FieldValue>>;

/// Whether `idol` passes every active field selection.
pub fn matches(idol: &Idol, filters: &FilterState) -> bool {
    filters
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .all(|(field, selected)| selected.iter().any(|value| field.matches(idol, value)))
}

/// Records passing all active filters, in input order.
pub fn apply<'a>(idols: &'a [Idol], filters: &FilterState) -> Vec<&'a Idol> {
    idols.iter().filter(|idol| matches(idol, filters)).collect()
}

/// Indices of records passing all active filters, in input order.
pub fn filtered_indices(dataset: &CatalogDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .idols
        .iter()
        .enumerate()
        .filter(|(_, idol)| matches(idol, filters))
        .map(|(i, _)| i)
        .collect()
}

/// Toggle a single value in a field's selection.
pub fn toggle(filters: &mut FilterState, field: FilterField, value: &FieldValue) {
    let selected = filters.entry(field).or_default();
    if !selected.remove(value) {
        selected.insert(value.clone());
    }
}

/// Number of fields that currently constrain the result.
pub fn active_field_count(filters: &FilterState) -> usize {
    filters.values().filter(|s| !s.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::idol;
    use crate::data::model::{Attribute::*, ProbabilityTier::*};

    fn sample() -> Vec<Idol> {
        vec![
            idol("a", "スコアアップ", Cute, "ボーカル", 7, High),
            idol("b", "コンボボーナス", Cool, "ダンス", 9, Medium),
            idol("c", "スコアアップ", Passion, "ビジュアル", 9, Low),
            idol("d", "オーバーロード", Cute, "ダンス", 6, High),
            idol("e", "コンボボーナス", Passion, "ボーカル", 7, Low),
        ]
    }

    fn names(result: &[&Idol]) -> Vec<String> {
        result.iter().map(|i| i.name.clone()).collect()
    }

    fn select(field: FilterField, values: &[FieldValue]) -> FilterState {
        let mut f = FilterState::new();
        f.insert(field, values.iter().cloned().collect());
        f
    }

    #[test]
    fn empty_selection_is_identity() {
        let idols = sample();
        assert_eq!(apply(&idols, &FilterState::new()).len(), idols.len());

        let mut f = FilterState::new();
        f.insert(FilterField::Skill, BTreeSet::new());
        f.insert(FilterField::Seconds, BTreeSet::new());
        let result = apply(&idols, &f);
        assert_eq!(names(&result), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn skill_selection_is_sound_and_complete() {
        let idols = sample();
        let wanted: BTreeSet<FieldValue> = [
            FieldValue::Text("スコアアップ".into()),
            FieldValue::Text("オーバーロード".into()),
        ]
        .into_iter()
        .collect();
        let mut f = FilterState::new();
        f.insert(FilterField::Skill, wanted.clone());

        let result = apply(&idols, &f);
        for r in &result {
            assert!(wanted.contains(&FilterField::Skill.value_of(r)));
        }
        let expected = idols
            .iter()
            .filter(|i| wanted.contains(&FilterField::Skill.value_of(i)))
            .count();
        assert_eq!(result.len(), expected);
        assert_eq!(names(&result), vec!["a", "c", "d"]);
    }

    #[test]
    fn fields_combine_with_and() {
        let idols = sample();
        let mut f = select(
            FilterField::Skill,
            &[FieldValue::Text("スコアアップ".into())],
        );
        f.insert(
            FilterField::Seconds,
            [FieldValue::Integer(9), FieldValue::Integer(6)].into_iter().collect(),
        );
        assert_eq!(names(&apply(&idols, &f)), vec!["c"]);
    }

    #[test]
    fn apply_is_idempotent() {
        let idols = sample();
        let f = select(FilterField::Seconds, &[FieldValue::Integer(7)]);
        let once: Vec<Idol> = apply(&idols, &f).into_iter().cloned().collect();
        let twice = apply(&once, &f);
        assert_eq!(names(&twice), vec!["a", "e"]);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn indices_match_apply() {
        let ds = CatalogDataset::from_idols(sample());
        let f = select(FilterField::Attribute, &[FieldValue::Attribute(Passion)]);
        assert_eq!(filtered_indices(&ds, &f), vec![2, 4]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut f = FilterState::new();
        let v = FieldValue::Integer(7);
        toggle(&mut f, FilterField::Seconds, &v);
        assert_eq!(active_field_count(&f), 1);
        toggle(&mut f, FilterField::Seconds, &v);
        assert_eq!(active_field_count(&f), 0);
        assert!(f[&FilterField::Seconds].is_empty());
    }
}
