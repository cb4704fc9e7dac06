use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{Idol, ProbabilityTier};

// ---------------------------------------------------------------------------
// Layout rules – which specialization columns a skill is laid out with
// ---------------------------------------------------------------------------

/// Column layout configuration, fixed for the lifetime of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRules {
    /// Columns used by every skill without an override.
    pub default_columns: Vec<String>,
    /// Skill name → its own column list.
    pub column_overrides: BTreeMap<String, Vec<String>>,
    /// Skills whose detail panel also shows sub-attribute and dominant.
    pub extended_detail_skills: BTreeSet<String>,
}

impl Default for LayoutRules {
    fn default() -> Self {
        let dual: Vec<String> = ["ボーカル&ダンス", "ダンス&ビジュアル", "ビジュアル&ボーカル"]
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            default_columns: ["ボーカル", "ダンス", "ビジュアル"]
                .into_iter()
                .map(String::from)
                .collect(),
            column_overrides: BTreeMap::from([
                ("ドミナント・ハーモニー".to_string(), dual.clone()),
                ("ミューチャル".to_string(), dual),
            ]),
            extended_detail_skills: BTreeSet::from(["ドミナント・ハーモニー".to_string()]),
        }
    }
}

impl LayoutRules {
    /// Ordered column labels for `skill`.
    pub fn columns_for(&self, skill: &str) -> &[String] {
        self.column_overrides
            .get(skill)
            .unwrap_or(&self.default_columns)
    }

    pub fn shows_extended_details(&self, skill: &str) -> bool {
        self.extended_detail_skills.contains(skill)
    }
}

// ---------------------------------------------------------------------------
// RowKey – (seconds, probability) bucket
// ---------------------------------------------------------------------------

/// Vertical bucket within a skill group. Ordered by seconds, then tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    pub seconds: u32,
    pub probability: ProbabilityTier,
}

impl RowKey {
    pub fn of(idol: &Idol) -> Self {
        RowKey {
            seconds: idol.seconds,
            probability: idol.probability,
        }
    }
}

/// Renders as the composite text key, e.g. `6低`.
impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.seconds, self.probability.code())
    }
}

// ---------------------------------------------------------------------------
// Resolved layout
// ---------------------------------------------------------------------------

/// One horizontal row of a skill group.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub key: RowKey,
    /// One cell per column of the group; each holds record indices in
    /// attribute display order. Empty cells render nothing.
    pub cells: Vec<Vec<usize>>,
}

/// All rows of one skill.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub skill: String,
    pub columns: Vec<String>,
    pub rows: Vec<LayoutRow>,
    /// Records whose specialty matches none of `columns`. Never rendered.
    pub dropped: Vec<usize>,
}

impl SkillGroup {
    /// Number of records placed in some cell.
    pub fn placed(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .map(Vec::len)
            .sum()
    }
}

/// Skill groups in first-appearance order of the filtered records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogLayout {
    pub groups: Vec<SkillGroup>,
}

/// Build the nested layout for the records at `indices` (already filtered).
pub fn resolve(idols: &[Idol], indices: &[usize], rules: &LayoutRules) -> CatalogLayout {
    // Partition by skill, remembering first appearance.
    let mut order: Vec<&str> = Vec::new();
    let mut members: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &idx in indices {
        let skill = idols[idx].skill.as_str();
        members
            .entry(skill)
            .or_insert_with(|| {
                order.push(skill);
                Vec::new()
            })
            .push(idx);
    }

    let groups = order
        .into_iter()
        .filter_map(|skill| {
            let group_indices = members.remove(skill)?;
            Some(resolve_group(idols, skill, &group_indices, rules))
        })
        .collect();

    CatalogLayout { groups }
}

fn resolve_group(idols: &[Idol], skill: &str, indices: &[usize], rules: &LayoutRules) -> SkillGroup {
    let columns = rules.columns_for(skill).to_vec();

    let keys: BTreeSet<RowKey> = indices.iter().map(|&i| RowKey::of(&idols[i])).collect();

    let rows = keys
        .into_iter()
        .map(|key| {
            let cells = columns
                .iter()
                .map(|column| {
                    let mut cell: Vec<usize> = indices
                        .iter()
                        .copied()
                        .filter(|&i| RowKey::of(&idols[i]) == key && idols[i].specialty == *column)
                        .collect();
                    cell.sort_by_key(|&i| idols[i].attribute);
                    cell
                })
                .collect();
            LayoutRow { key, cells }
        })
        .collect();

    let dropped: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| !columns.contains(&idols[i].specialty))
        .collect();
    if !dropped.is_empty() {
        log::debug!(
            "skill '{skill}': {} record(s) have no matching column and are not shown",
            dropped.len()
        );
    }

    SkillGroup {
        skill: skill.to_string(),
        columns,
        rows,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::idol;
    use crate::data::model::{Attribute::*, ProbabilityTier::*};

    fn all(idols: &[Idol]) -> Vec<usize> {
        (0..idols.len()).collect()
    }

    #[test]
    fn row_keys_sort_by_seconds_then_tier() {
        let mut keys = vec![
            RowKey { seconds: 9, probability: Low },
            RowKey { seconds: 6, probability: High },
            RowKey { seconds: 11, probability: Low },
            RowKey { seconds: 6, probability: Low },
            RowKey { seconds: 6, probability: Medium },
        ];
        keys.sort();
        let text: Vec<String> = keys.iter().map(RowKey::to_string).collect();
        assert_eq!(text, vec!["6低", "6中", "6高", "9低", "11低"]);
    }

    #[test]
    fn same_seconds_low_before_high() {
        let idols = vec![
            idol("hi", "Solo", Cute, "ボーカル", 6, High),
            idol("lo", "Solo", Cute, "ボーカル", 6, Low),
        ];
        let layout = resolve(&idols, &all(&idols), &LayoutRules::default());
        let keys: Vec<String> = layout.groups[0].rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys, vec!["6低", "6高"]);
        assert_eq!(layout.groups[0].rows[0].cells[0], vec![1]);
    }

    #[test]
    fn groups_follow_first_appearance() {
        let idols = vec![
            idol("a", "コンボボーナス", Cute, "ダンス", 7, High),
            idol("b", "スコアアップ", Cute, "ダンス", 7, High),
            idol("c", "コンボボーナス", Cute, "ダンス", 7, High),
            idol("d", "アンサンブル", Cute, "ダンス", 7, High),
        ];
        let layout = resolve(&idols, &all(&idols), &LayoutRules::default());
        let skills: Vec<&str> = layout.groups.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(skills, vec!["コンボボーナス", "スコアアップ", "アンサンブル"]);

        // Filtering out a skill removes its group entirely.
        let layout = resolve(&idols, &[1, 3], &LayoutRules::default());
        let skills: Vec<&str> = layout.groups.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(skills, vec!["スコアアップ", "アンサンブル"]);
    }

    #[test]
    fn cells_are_ordered_by_attribute() {
        let idols = vec![
            idol("pa", "スコアアップ", Passion, "ビジュアル", 7, High),
            idol("cu", "スコアアップ", Cute, "ビジュアル", 7, High),
            idol("co", "スコアアップ", Cool, "ビジュアル", 7, High),
            idol("cu2", "スコアアップ", Cute, "ビジュアル", 7, High),
        ];
        let layout = resolve(&idols, &all(&idols), &LayoutRules::default());
        let row = &layout.groups[0].rows[0];
        assert!(row.cells[0].is_empty());
        assert!(row.cells[1].is_empty());
        assert_eq!(row.cells[2], vec![1, 3, 2, 0]);
    }

    #[test]
    fn columns_are_deterministic() {
        let rules = LayoutRules::default();
        assert_eq!(rules.columns_for("スコアアップ"), rules.columns_for("スコアアップ"));
        assert_eq!(rules.columns_for("スコアアップ"), &["ボーカル", "ダンス", "ビジュアル"]);
        assert_eq!(
            rules.columns_for("ミューチャル"),
            &["ボーカル&ダンス", "ダンス&ビジュアル", "ビジュアル&ボーカル"]
        );
        assert_eq!(rules.columns_for("ドミナント・ハーモニー"), rules.columns_for("ミューチャル"));
    }

    #[test]
    fn override_columns_drop_unmatched_specialty() {
        let idols = vec![
            idol("vd", "ドミナント・ハーモニー", Cute, "ボーカル&ダンス", 9, High),
            idol("dv", "ドミナント・ハーモニー", Cool, "ダンス&ビジュアル", 9, High),
            idol("vv", "ドミナント・ハーモニー", Passion, "ビジュアル&ボーカル", 9, High),
            idol("plain", "ドミナント・ハーモニー", Cute, "ボーカル", 9, High),
        ];
        let layout = resolve(&idols, &all(&idols), &LayoutRules::default());
        let group = &layout.groups[0];

        assert_eq!(group.rows.len(), 1);
        assert!(group.rows[0].cells.iter().all(|c| c.len() == 1));
        assert_eq!(group.placed(), 3);
        assert_eq!(group.dropped, vec![3]);
    }

    #[test]
    fn row_exists_even_when_all_its_records_are_dropped() {
        let idols = vec![
            idol("a", "スコアアップ", Cute, "ボーカル", 7, High),
            idol("b", "スコアアップ", Cute, "オールラウンド", 11, Low),
        ];
        let layout = resolve(&idols, &all(&idols), &LayoutRules::default());
        let group = &layout.groups[0];
        assert_eq!(group.rows.len(), 2);
        assert!(group.rows[1].cells.iter().all(Vec::is_empty));
        assert_eq!(group.dropped, vec![1]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let layout = resolve(&[], &[], &LayoutRules::default());
        assert!(layout.groups.is_empty());
    }
}
