use std::io::Write;
use std::path::PathBuf;
use anyhow::{Context, Result};
use tracing::*;

use rideshare::*;
use rideshare::data::get_trip_set;
use rideshare::data::trips::*;
use rideshare::route::RouteEvent;
use rideshare::travel::EuclideanTravelTime;

mod common;
use common::*;

use structopt::StructOpt;

const RULE: &str = "=========================================================";

/// Plan vehicle routes for a file of ride requests.
#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Tab-separated trip file with one header line
    #[structopt(parse(from_os_str))]
    trips: PathBuf,
    /// Seats per vehicle
    #[structopt(long, short="c", default_value="3", validator=clap_range_validator(Some(1), None))]
    capacity: Demand,
    /// Map scale
    #[structopt(long="pixel-per-km", default_value="5")]
    pixel_per_km: f64,
    /// Average speed in km per minute
    #[structopt(long="speed", default_value="1")]
    avg_speed_per_min: f64,
    #[structopt(flatten)]
    output: OutputOptions,
}

struct Report<'a> {
    trips: &'a TripSet,
    schedule: &'a Schedule,
    index: Map<TripId, usize>,
}

impl<'a> Report<'a> {
    fn new(trips: &'a TripSet, schedule: &'a Schedule) -> Self {
        Report { trips, schedule, index: trips.index_by_id() }
    }

    fn requester(&self, id: TripId) -> &str {
        self.index.get(&id)
            .map_or("?", |&k| self.trips.trips[k].requester.as_str())
    }

    fn clock(&self, e: &RouteEvent) -> String {
        self.trips.clock_time(e.time).format("%H:%M:%S").to_string()
    }

    fn event_record(&self, e: &RouteEvent) -> json::JsonValue {
        let requester = e.trip.map(|id| self.requester(id).to_string());
        let loc = e.loc.map(|(x, y)| vec![x, y]);
        json::object! {
            kind: e.kind.to_string(),
            trip: e.trip,
            requester: requester,
            time: e.time,
            clock: self.clock(e),
            loc: loc,
            load: e.load,
        }
    }
}

impl<'a> ScheduleOutput for Report<'a> {
    fn write_text(&self, mut buf: impl Write) -> Result<()> {
        for (v, legs) in self.schedule.itineraries().into_iter().enumerate() {
            writeln!(buf, "{}", RULE)?;
            writeln!(buf, "VEHICLE {}", v + 1)?;
            writeln!(buf, "{}", RULE)?;
            for e in legs.iter().flat_map(|r| r.stops()) {
                let id = e.trip.unwrap_or_default();
                let (x, y) = e.loc.unwrap_or_default();
                writeln!(buf, "{} > {} {}:{} @ [{}, {}]", self.clock(e), e.kind, id, self.requester(id), x as i64, y as i64)?;
            }
        }
        return Ok(())
    }

    fn write_json(&self, mut buf: impl Write) -> Result<()> {
        let vehicles: Vec<json::JsonValue> = self.schedule.itineraries().into_iter()
            .enumerate()
            .map(|(v, legs)| {
                let legs: Vec<json::JsonValue> = legs.into_iter()
                    .map(|r| json::JsonValue::from(r.events.iter().map(|e| self.event_record(e)).collect::<Vec<_>>()))
                    .collect();
                let vehicle = v + 1;
                json::object! { vehicle: vehicle, legs: legs }
            })
            .collect();
        let blocks: Vec<json::JsonValue> = self.schedule.blocks.iter()
            .map(|b| {
                let vehicles = b.vehicles.len();
                json::object! { trips: b.trips.clone(), vehicles: vehicles }
            })
            .collect();
        let root = json::object! {
            instance: self.trips.id.clone(),
            time_zero: self.trips.time_zero.format("%Y-%m-%d %H:%M:%S").to_string(),
            blocks: blocks,
            vehicles: vehicles,
        };
        root.write_pretty(&mut buf, 2)?;
        return Ok(())
    }
}


fn main() -> anyhow::Result<()> {
    let args : ClArgs = StructOpt::from_args();
    let _g = init_logging(args.output.log.clone())?;
    debug!(?args);

    let trips = get_trip_set(&args.trips)?;
    info!(instance = %trips.id, count = trips.len(), "loaded trips");

    let config = SolverConfig {
        capacity: args.capacity,
        travel: EuclideanTravelTime { pixel_per_km: args.pixel_per_km, avg_speed_per_min: args.avg_speed_per_min },
    };
    let schedule = solve(&trips.trips, &config)
        .with_context(|| format!("failed to schedule {:?}", &args.trips))?;

    output_schedule(&args.output, Report::new(&trips, &schedule))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Result<(TripSet, Schedule)> {
        let trips = get_trip_set(concat!(env!("CARGO_MANIFEST_DIR"), "/../instances/data/simpsons.tsv"))?;
        let schedule = solve(&trips.trips, &SolverConfig::default())?;
        Ok((trips, schedule))
    }

    #[test]
    fn text_itinerary() -> Result<()> {
        let (trips, schedule) = sample()?;
        let mut buf = Vec::new();
        Report::new(&trips, &schedule).write(&mut buf, OutputFormat::Text)?;
        let text = String::from_utf8(buf)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "VEHICLE 1");
        assert_eq!(lines[3], "08:00:00 > Pickup 1:Homer @ [100, 100]");
        assert_eq!(lines[4], "08:05:00 > Pickup 2:Marge @ [110, 120]");
        assert!(text.contains("VEHICLE 2"));
        assert!(text.contains("08:20:00 > Pickup 3:Bart @ [300, 300]"));
        // vehicle 1 also drives the second block
        let v2 = lines.iter().position(|l| *l == "VEHICLE 2").unwrap();
        assert!(lines[..v2].iter().any(|l| l.contains("Dropoff 5:Maggie")));
        Ok(())
    }

    #[test]
    fn json_report() -> Result<()> {
        let (trips, schedule) = sample()?;
        let mut buf = Vec::new();
        Report::new(&trips, &schedule).write(&mut buf, OutputFormat::Json)?;
        let parsed = json::parse(&String::from_utf8(buf)?)?;
        assert_eq!(parsed["instance"], "simpsons");
        assert_eq!(parsed["vehicles"].len(), 2);
        assert_eq!(parsed["vehicles"][0]["legs"].len(), 2);
        assert_eq!(parsed["vehicles"][0]["legs"][0][0]["kind"], "Start");
        assert_eq!(parsed["vehicles"][0]["legs"][0][1]["requester"], "Homer");
        assert_eq!(parsed["blocks"][1]["trips"].len(), 2);
        Ok(())
    }
}
