use std::path::Path;
use anyhow::Context;
use crate::Result;
use crate::raw::trips::*;
use super::{
  ParseInstance,
  nom_prelude::*
};

/// Tab-separated trip file on disk: a header line, then
/// `requester trip_id depart_after arrive_before X1 Y1 X2 Y2` per trip.
#[derive(Debug, Copy, Clone)]
pub struct TsvFmt<P>(pub P);

/// Same format as [`TsvFmt`], already in memory.
#[derive(Debug, Copy, Clone)]
pub struct TsvStr<'a>(pub &'a str);

impl<P: AsRef<Path>> ParseInstance<TsvFmt<P>> for TripTable {
  fn parse(path: TsvFmt<P>) -> Result<TripTable> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read {:?}", path))?;
    TripTable::parse(TsvStr(&data))
  }
}

impl<'a> ParseInstance<TsvStr<'a>> for TripTable {
  fn parse(input: TsvStr<'a>) -> Result<TripTable> {
    let data = input.0;
    match parsers::trip_table(data).finish() {
      Ok((_, table)) => {
        if table.records.is_empty() {
          return Err(crate::Error::EmptyTripFile.into());
        }
        Ok(table)
      },
      Err(e) => Err(
        anyhow::Error::msg(error::convert_error(data, e))
      ),
    }
  }
}


mod parsers {
  use super::*;
  use crate::parsers::common::*;

  fn coord<'a, E>(input: &'a str) -> IResult<&'a str, Coord, E>
    where
      E: error::ParseError<&'a str>
  {
    separated_pair(double, tab_, double)(input)
  }

  fn record(input: &str) -> IResult<&str, TripRecord, error::VerboseError<&str>> {
    let (input, (requester, trip_id, depart_after, arrive_before, origin, destination)) = tuple((
      context("requester", terminated(field, tab_)),
      context("trip id", terminated(usize_, tab_)),
      context("depart after", terminated(timestamp, tab_)),
      context("arrive before", terminated(timestamp, tab_)),
      context("origin", terminated(coord, tab_)),
      context("destination", terminated(coord, many0(char(' ')))),
    ))(input)?;

    Ok((input, TripRecord {
      requester: requester.trim().to_string(),
      trip_id,
      depart_after,
      arrive_before,
      origin,
      destination,
    }))
  }

  pub fn trip_table(input: &str) -> IResult<&str, TripTable, error::VerboseError<&str>> {
    // header row carries no data
    let (input, _) = context("header", terminated(not_line_ending, line_ending))(input)?;
    let (input, records) = separated_list0(line_ending, record)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, TripTable { records }))
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "requester\ttrip_id\tdepart_after\tarrive_before\tX1\tY1\tX2\tY2\n\
Homer\t1\t2016-05-01 08:00:00\t2016-05-01 09:00:00\t10\t20\t110\t120\n\
Marge\t2\t2016-05-01 08:15:00\t2016-05-01 09:30:00\t15.5\t25\t300\t-40\n";

  #[test]
  fn parse_sample() -> Result<()> {
    let table = TripTable::parse(TsvStr(SAMPLE))?;
    assert_eq!(table.records.len(), 2);
    let marge = &table.records[1];
    assert_eq!(marge.requester, "Marge");
    assert_eq!(marge.trip_id, 2);
    assert_eq!(marge.origin, (15.5, 25.0));
    assert_eq!(marge.destination, (300.0, -40.0));
    assert_eq!(marge.depart_after.format("%H:%M").to_string(), "08:15");
    Ok(())
  }

  #[test]
  fn windows_line_endings() -> Result<()> {
    let crlf = SAMPLE.replace('\n', "\r\n");
    assert_eq!(TripTable::parse(TsvStr(&crlf))?, TripTable::parse(TsvStr(SAMPLE))?);
    Ok(())
  }

  #[test]
  fn header_only_is_empty() {
    let err = TripTable::parse(TsvStr("requester\ttrip_id\n")).unwrap_err();
    assert_eq!(err.downcast_ref::<crate::Error>(), Some(&crate::Error::EmptyTripFile));
  }

  #[test]
  fn bad_row_is_rejected() {
    let bad = "header\nHomer\tone\t08:00\t09:00\t0\t0\t1\t1\n";
    assert!(TripTable::parse(TsvStr(bad)).is_err());
  }

  #[test]
  fn sample_file() -> Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/simpsons.tsv");
    let table = TripTable::parse(TsvFmt(path))?;
    assert_eq!(table.records.len(), 5);
    Ok(())
  }
}
