use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::filter::{self, FilterState};
use crate::data::layout;
use crate::data::loader::{self, CatalogError};
use crate::data::model::{CatalogDataset, FieldValue, FilterField};
use crate::view::{CatalogView, ViewSettings};

// ---------------------------------------------------------------------------
// Load failure
// ---------------------------------------------------------------------------

/// Why the last load failed. Replaces the catalog in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// The file itself could not be read, as opposed to read but rejected.
    pub file_missing: bool,
    pub message: String,
}

impl LoadFailure {
    fn from_catalog_error(err: &CatalogError) -> Self {
        LoadFailure {
            file_missing: matches!(err, CatalogError::Unavailable { .. }),
            message: err.to_string(),
        }
    }

    pub fn headline(&self) -> &'static str {
        if self.file_missing {
            "CSVファイルが見つかりません！"
        } else {
            "CSVファイルを読み込めません"
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// File the catalog was (or will be) loaded from.
    pub data_path: PathBuf,

    /// Loaded catalog (None until a load succeeds).
    pub dataset: Option<CatalogDataset>,

    /// Per-field filter selections.
    pub filters: FilterState,

    /// Display model for the current selections (cached between frames).
    pub view: CatalogView,

    /// Records passing the current filters.
    pub visible: usize,

    /// Fatal load error; replaces the catalog in the UI.
    pub load_error: Option<LoadFailure>,
}

impl AppState {
    pub fn new(config: AppConfig, data_path: PathBuf) -> Self {
        Self {
            config,
            data_path,
            dataset: None,
            filters: FilterState::default(),
            view: CatalogView::default(),
            visible: 0,
            load_error: None,
        }
    }

    /// Load `path`, replacing the current catalog. On failure nothing from
    /// the previous catalog stays on screen.
    pub fn load(&mut self, path: &Path) {
        self.data_path = path.to_path_buf();
        let result = self
            .config
            .load_options()
            .map_err(|e| LoadFailure {
                file_missing: false,
                message: e.to_string(),
            })
            .and_then(|options| {
                loader::load_file(path, &options)
                    .map_err(|e| LoadFailure::from_catalog_error(&e))
            });

        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(failure) => {
                log::error!("Failed to load catalog: {}", failure.message);
                self.dataset = None;
                self.view = CatalogView::default();
                self.visible = 0;
                self.load_error = Some(failure);
            }
        }
    }

    /// Reload the current file.
    pub fn reload(&mut self) {
        let path = self.data_path.clone();
        self.load(&path);
    }

    /// Ingest a newly loaded dataset and run the first pass.
    pub fn set_dataset(&mut self, dataset: CatalogDataset) {
        self.filters = FilterState::default();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Re-run filter → layout → view after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let indices = filter::filtered_indices(ds, &self.filters);
        let layout = layout::resolve(&ds.idols, &indices, &self.config.layout);
        let settings = ViewSettings {
            image_root: self.config.image_root_for(&self.data_path),
            missing_placeholder: self.config.missing_placeholder.clone(),
        };
        self.view = CatalogView::build(ds, &layout, &self.config.layout, &settings);
        self.visible = indices.len();
        log::info!(
            "{} of {} idols match, {} shown in {} group(s), {} missing image(s)",
            self.visible,
            ds.len(),
            self.view.shown,
            self.view.groups.len(),
            self.view.missing_images
        );
    }

    /// Toggle a single value in a field's selection.
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &FieldValue) {
        filter::toggle(&mut self.filters, field, value);
        self.refilter();
    }

    /// Whether `value` is currently selected for `field`.
    pub fn is_selected(&self, field: FilterField, value: &FieldValue) -> bool {
        self.filters
            .get(&field)
            .is_some_and(|selected| selected.contains(value))
    }

    /// Drop every selection for one field.
    pub fn clear_field(&mut self, field: FilterField) {
        self.filters.remove(&field);
        self.refilter();
    }

    /// Drop every selection.
    pub fn clear_all(&mut self) {
        self.filters.clear();
        self.refilter();
    }
}
