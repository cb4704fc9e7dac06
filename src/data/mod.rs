/// Data layer: core types, loading, filtering, and layout.
///
/// Architecture:
/// ```text
///  idol-list.csv (Shift_JIS)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → CatalogDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ CatalogDataset  │  Vec<Idol>, distinct filter values
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  per-field selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  layout   │  skill → (seconds, tier) rows × specialty columns
///   └──────────┘
/// ```

pub mod filter;
pub mod layout;
pub mod loader;
pub mod model;
