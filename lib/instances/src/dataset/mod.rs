use std::path::Path;
use anyhow::{Context, Result};
use std::borrow::Cow;

use crate::parsers::{ParseInstance, TsvFmt};
use crate::raw::{FromRaw, trips::TripTable};

pub mod trips;
pub use trips::{TripSet, TripRequest, TripId, Time, Point};

/// Load a tab-separated trip file; the instance is named after the file stem.
pub fn load_trips(path: impl AsRef<Path>) -> Result<TripSet> {
  let path = path.as_ref();
  let raw = TripTable::parse(TsvFmt(path)).context(format!("failed to load {:?}", path))?;
  let name = path.file_stem()
    .map(|s| s.to_string_lossy())
    .unwrap_or(Cow::Borrowed("trips"));
  Ok(TripSet::from_raw(raw, name))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn load_sample() -> Result<()> {
    let set = load_trips(concat!(env!("CARGO_MANIFEST_DIR"), "/data/simpsons.tsv"))?;
    assert_eq!(set.id, "simpsons");
    assert_eq!(set.len(), 5);
    assert_eq!(set.trips[0].depart_after, 0.0);
    Ok(())
  }

  #[test]
  #[should_panic]
  fn fail_load_missing_file() {
    load_trips("no/such/file.tsv").unwrap();
  }
}
