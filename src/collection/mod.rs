//! Collection filtering and sorting
//!
//! Pure, synchronous functions over immutable product snapshots. Nothing
//! here performs I/O or mutates its inputs.

pub mod facets;
pub mod filter;
pub mod product;
pub mod sort;
pub mod view;

pub use facets::{Facet, IN_STOCK, OUT_OF_STOCK, facet_counts};
pub use filter::{FilterState, filter};
pub use product::{ParsedProducts, Product, SkippedRecord, Variant, parse_products};
pub use sort::{SortKey, sort};
pub use view::CollectionView;
