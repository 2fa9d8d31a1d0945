pub(crate) mod categories;
pub(crate) mod migrate;

#[cfg(feature = "github")]
pub(crate) mod backfill;

#[cfg(feature = "github")]
pub(crate) mod sync;
