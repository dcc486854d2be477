//! Kernel log tailing: record decoding, sources, filtering and the timestamp-ordered merge.

/// Log record codec.
pub mod entry;
/// Priority threshold and curated allow-list.
pub mod filter;
/// Timestamp-ordered merge of several sources.
pub mod multiplexer;
/// Log sources and factories.
pub mod source;
