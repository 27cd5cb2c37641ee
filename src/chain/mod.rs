mod metadata;
mod source;
mod transfer;

pub use metadata::{
    AddressMetadata, AddressMetadataCache, MetadataError, MetadataSource, ProgressFn,
    UNRESOLVED_BALANCE,
};
pub use source::SnapshotSource;
pub use transfer::{Direction, SortOrder, Transfer, TransferFilter, filter_and_sort};
