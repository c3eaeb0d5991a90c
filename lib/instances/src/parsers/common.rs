use super::nom_prelude::*;
use std::num::ParseIntError;
use std::str::FromStr;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn usize_<'a, E>(input: &'a str) -> IResult<&'a str, usize, E>
  where
    E: ParseError<&'a str> + error::FromExternalError<&'a str, ParseIntError>
{
  map_res(digit1, usize::from_str)(input)
}

/// A single tab-delimited field: everything up to the next tab or line break.
pub fn field<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
  where
    E: ParseError<&'a str>
{
  is_not("\t\r\n")(input)
}

pub fn tab_<'a, E>(input: &'a str) -> IResult<&'a str, char, E>
  where
    E: ParseError<&'a str>
{
  char('\t')(input)
}

const DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M:%S",
  "%m/%d/%Y %H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Clock-only timestamps are placed on this date.
pub fn anchor_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, crate::Error> {
  let s = s.trim();
  DATETIME_FORMATS.iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .or_else(|| TIME_FORMATS.iter()
      .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
      .map(|t| anchor_date().and_time(t)))
    .ok_or(crate::Error::BadTimestamp)
}

pub fn timestamp<'a, E>(input: &'a str) -> IResult<&'a str, NaiveDateTime, E>
  where
    E: ParseError<&'a str> + error::FromExternalError<&'a str, crate::Error>
{
  map_res(field, parse_timestamp)(input)
}
