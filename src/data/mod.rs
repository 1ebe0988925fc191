/// Data layer: Bruker parsing, shift arithmetic, and peak filtering.
///
/// Architecture:
/// ```text
///  pdata/<procno>/  (procs, 1r, peaklist.xml; acqus two levels up)
///        │
///        ▼
///   ┌──────────┐
///   │  bruker   │  parse vendor files → acquisition params + samples
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  shift    │  params → ppm axis; exact-match windowing
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  peaks    │  peaklist.xml → percentile-filtered table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  compose everything → LoadedDataset
///   └──────────┘
/// ```
///
/// Everything in here is headless; the egui layer only consumes it.

pub mod bruker;
pub mod error;
pub mod loader;
pub mod model;
pub mod peaks;
pub mod shift;
