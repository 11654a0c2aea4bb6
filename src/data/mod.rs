/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  upload (.csv / .json)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  ordered columns, inferred dtypes, rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Category / Value predicates → DatasetView
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
