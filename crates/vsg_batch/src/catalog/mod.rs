//! Track catalog: what can be selected from each source.
//!
//! [`TrackCatalog`] sits in front of a [`MediaInspector`] (normally
//! [`MkvmergeInspector`]) and normalizes its answers for the layout editor.

mod inspector;
mod track_catalog;

pub use inspector::{parse_mkvmerge_json, CatalogError, MediaInspector, MkvmergeInspector};
pub use track_catalog::{ScanOutcome, TrackCatalog};
