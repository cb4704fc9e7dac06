//! Fully resolved display model handed to the egui layer.
//!
//! Everything here is plain data: strings ready to print and image
//! references already checked against the filesystem. The UI never looks at
//! an [`Idol`] directly.

use std::path::{Path, PathBuf};

use crate::data::layout::{CatalogLayout, LayoutRules, SkillGroup};
use crate::data::model::{CatalogDataset, Idol};

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Result of the per-record image existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Found(PathBuf),
    /// The reference as written in the catalog.
    Missing(String),
}

/// Resolve an image reference against `root` and check it exists.
pub fn resolve_image(reference: &str, root: &Path) -> ImageRef {
    let raw = reference.strip_prefix("file://").unwrap_or(reference);
    let path = Path::new(raw);
    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    if full.is_file() {
        ImageRef::Found(full)
    } else {
        ImageRef::Missing(reference.to_string())
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// One rendered record: image, name label, and the expandable details.
#[derive(Debug, Clone, PartialEq)]
pub struct IdolCard {
    /// Index into the dataset; used as a stable widget id.
    pub index: usize,
    pub name_lines: Vec<String>,
    pub image: ImageRef,
    pub details: Vec<DetailField>,
}

/// Split a name on its `<br>` markers.
pub fn name_lines(name: &str) -> Vec<String> {
    name.replace("<br />", "<br>")
        .replace("<br/>", "<br>")
        .split("<br>")
        .map(|line| line.trim().to_string())
        .collect()
}

/// Settings that shape the view but not the layout.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub image_root: PathBuf,
    pub missing_placeholder: String,
}

fn field(label: &'static str, value: impl Into<String>) -> DetailField {
    DetailField {
        label,
        value: value.into(),
    }
}

fn detail_fields(idol: &Idol, extended: bool, placeholder: &str) -> Vec<DetailField> {
    let or_placeholder = |v: &Option<String>| v.clone().unwrap_or_else(|| placeholder.to_string());
    let stat = |v: Option<u32>| v.map_or_else(|| placeholder.to_string(), |n| n.to_string());

    let mut fields = vec![
        field("属性", idol.attribute.to_string()),
        field("特化", idol.specialty.as_str()),
        field("秒数", format!("{} 秒", idol.seconds)),
        field("確率", idol.probability.to_string()),
        field("スキル", idol.skill.as_str()),
        field("センター効果", or_placeholder(&idol.center_effect)),
        field("Vo", stat(idol.vocal)),
        field("Da", stat(idol.dance)),
        field("Vi", stat(idol.visual)),
        field("メモリアルガシャ", or_placeholder(&idol.memorial_gacha)),
    ];
    if extended {
        fields.push(field("副属性", or_placeholder(&idol.sub_attribute)));
        fields.push(field("ドミナント", or_placeholder(&idol.dominant)));
    }
    fields
}

impl IdolCard {
    pub fn build(index: usize, idol: &Idol, rules: &LayoutRules, settings: &ViewSettings) -> Self {
        IdolCard {
            index,
            name_lines: name_lines(&idol.name),
            image: resolve_image(&idol.image, &settings.image_root),
            details: detail_fields(
                idol,
                rules.shows_extended_details(&idol.skill),
                &settings.missing_placeholder,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// e.g. `秒数: 7高`
    pub header: String,
    /// Parallel to [`GroupView::columns`].
    pub cells: Vec<Vec<IdolCard>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    /// e.g. `スキル: コンボボーナス`
    pub header: String,
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
}

/// The complete display model for one pipeline pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    pub groups: Vec<GroupView>,
    /// Records placed in some cell.
    pub shown: usize,
    pub missing_images: usize,
}

impl CatalogView {
    pub fn build(
        dataset: &CatalogDataset,
        layout: &CatalogLayout,
        rules: &LayoutRules,
        settings: &ViewSettings,
    ) -> Self {
        let mut view = CatalogView::default();
        for group in &layout.groups {
            let group_view = view.build_group(dataset, group, rules, settings);
            view.groups.push(group_view);
        }
        view
    }

    fn build_group(
        &mut self,
        dataset: &CatalogDataset,
        group: &SkillGroup,
        rules: &LayoutRules,
        settings: &ViewSettings,
    ) -> GroupView {
        let rows = group
            .rows
            .iter()
            .map(|row| RowView {
                header: format!("秒数: {}", row.key),
                cells: row
                    .cells
                    .iter()
                    .map(|cell| {
                        cell.iter()
                            .map(|&i| {
                                let card = IdolCard::build(i, &dataset.idols[i], rules, settings);
                                if let ImageRef::Missing(reference) = &card.image {
                                    log::warn!("画像が見つかりません: {reference}");
                                    self.missing_images += 1;
                                }
                                self.shown += 1;
                                card
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        GroupView {
            header: format!("スキル: {}", group.skill),
            columns: group.columns.clone(),
            rows,
        }
    }
}
