//! Boot animation archives: the `desc.txt` manifest and the frames it refers to.

/// Manifest model and parser.
pub mod descriptor;
/// Frame resolution against an archive listing.
pub mod frames;
