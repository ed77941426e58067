mod constants;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use citypair_core::constants::{DEFAULT_SPEED_KM_MS, NO_DELAY_MS, NO_LOSS_PCT};
use citypair_core::{
    apply_inflation, complete_matrix, parse_matrix, CellValue, CityDirectory, GeoCoordinate,
    Matrix, Stats,
};

use constants::*;

#[derive(Parser, Debug)]
#[command(
    name = "citypair",
    about = "Extract a city-pair delay or loss matrix from an HTML report"
)]
struct Args {
    /// Metric the page reports.
    #[arg(value_enum)]
    metric: Metric,

    /// HTML file containing the measurement table.
    input: PathBuf,

    /// City table: one CODE,ABBREV,NAME line per city.
    #[arg(long = "city-data", default_value = DEFAULT_CITY_FILE)]
    city_data: PathBuf,

    /// Coordinate table; when given, delay cells are rewritten as
    /// distance-normalized inflation ratios.
    #[arg(long)]
    locs: Option<PathBuf>,

    /// Propagation speed for the expected RTT, in km/ms.
    #[arg(long, default_value_t = DEFAULT_SPEED_KM_MS)]
    speed_km_ms: f64,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Emit observed source/destination/value triples instead of the dense grid.
    #[arg(long)]
    adjacency: bool,

    /// Emit the completed matrix and statistics as pretty-printed JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Metric {
    /// Round-trip latency in milliseconds.
    Delay,
    /// Packet loss percentage.
    Loss,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("[!!] {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let page = fs::read_to_string(&args.input)?;
    let cities = load_city_data(&args.city_data)?;

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match args.metric {
        Metric::Delay => {
            let (matrix, stats) = parse_matrix::<i64>(&page, &cities, NO_DELAY_MS)?;
            match &args.locs {
                Some(locs_path) => {
                    let locations = load_locations(locs_path)?;
                    let inflated = apply_inflation(&matrix, &locations, args.speed_km_ms)?;
                    write_report(&mut *out, args, "delay", &inflated, &stats, NO_DELAY_MS as f64)?;
                }
                None => write_report(&mut *out, args, "delay", &matrix, &stats, NO_DELAY_MS)?,
            }
        }
        Metric::Loss => {
            let (matrix, stats) = parse_matrix::<f64>(&page, &cities, NO_LOSS_PCT)?;
            write_report(&mut *out, args, "loss", &matrix, &stats, NO_LOSS_PCT)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Load the city table: one `CODE,ABBREV,NAME` line per city. Empty
/// abbreviation or name fields are skipped.
fn load_city_data(path: &Path) -> Result<CityDirectory, Box<dyn Error>> {
    read_city_data(BufReader::new(File::open(path)?))
}

fn read_city_data<R: BufRead>(reader: R) -> Result<CityDirectory, Box<dyn Error>> {
    let mut cities = CityDirectory::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(FIELD_SEP);
        let (Some(code), Some(abbrev), Some(name)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(format!("bad city table line: {line}").into());
        };
        if !abbrev.trim().is_empty() {
            cities.add_abbrev(abbrev.trim(), code.trim());
        }
        if !name.trim().is_empty() {
            cities.add_name(name.trim(), code.trim());
        }
    }
    Ok(cities)
}

/// Load city coordinates: `CODE<TAB>lat:lon[,lat:lon...]`. The first
/// coordinate pair is taken as the city center.
fn load_locations(path: &Path) -> Result<HashMap<String, GeoCoordinate>, Box<dyn Error>> {
    read_locations(BufReader::new(File::open(path)?))
}

fn read_locations<R: BufRead>(reader: R) -> Result<HashMap<String, GeoCoordinate>, Box<dyn Error>> {
    let mut locations = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (code, coords) = line
            .split_once(LOC_SEP)
            .ok_or_else(|| format!("bad coordinate line: {line}"))?;
        let first = coords.split(FIELD_SEP).next().unwrap_or(coords);
        let (lat, lon) = first
            .trim()
            .split_once(COORD_SEP)
            .ok_or_else(|| format!("bad coordinate pair: {first}"))?;
        locations.insert(
            code.trim().to_uppercase(),
            GeoCoordinate {
                lat: lat.trim().parse()?,
                lon: lon.trim().parse()?,
            },
        );
    }
    Ok(locations)
}

fn write_report<M, S>(
    out: &mut dyn Write,
    args: &Args,
    metric: &str,
    matrix: &Matrix<M>,
    stats: &Stats<S>,
    missing: M,
) -> Result<(), Box<dyn Error>>
where
    M: CellValue + Serialize,
    S: CellValue + Serialize,
{
    if args.adjacency {
        return write_pairs(out, matrix, missing);
    }
    let full = complete_matrix(matrix, missing);
    if args.json {
        write_json(out, metric, &full, stats)
    } else {
        write_grid(out, &full, stats)
    }
}

/// Dense grid as delimited text: a header line of destination codes, one
/// line per source code, and a trailing min/max/avg comment.
fn write_grid<M: CellValue, S: CellValue>(
    out: &mut dyn Write,
    full: &Matrix<M>,
    stats: &Stats<S>,
) -> Result<(), Box<dyn Error>> {
    let mut sources: Vec<&String> = full.keys().collect();
    sources.sort();
    let mut cols: BTreeSet<&String> = BTreeSet::new();
    for row in full.values() {
        cols.extend(row.keys());
    }

    for col in &cols {
        write!(out, "{FIELD_SEP}{col}")?;
    }
    writeln!(out)?;

    for src in sources {
        write!(out, "{src}")?;
        let row = &full[src];
        for col in &cols {
            match row.get(*col) {
                Some(value) => write!(out, "{FIELD_SEP}{value}")?,
                None => write!(out, "{FIELD_SEP}")?,
            }
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "#> min./max./avg. : {}, {}, {}",
        stats.min, stats.max, stats.avg
    )?;
    Ok(())
}

/// One line per observed pair, skipping missing markers.
fn write_pairs<M: CellValue>(
    out: &mut dyn Write,
    matrix: &Matrix<M>,
    missing: M,
) -> Result<(), Box<dyn Error>> {
    let mut sources: Vec<&String> = matrix.keys().collect();
    sources.sort();
    for src in sources {
        let row = &matrix[src];
        let mut dests: Vec<&String> = row.keys().collect();
        dests.sort();
        for dst in dests {
            let value = row[dst];
            if value == missing {
                continue;
            }
            writeln!(out, "{src:>20} {dst:<20} {value}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a, M, S> {
    metric: &'a str,
    stats: &'a Stats<S>,
    matrix: &'a Matrix<M>,
}

fn write_json<M, S>(
    out: &mut dyn Write,
    metric: &str,
    full: &Matrix<M>,
    stats: &Stats<S>,
) -> Result<(), Box<dyn Error>>
where
    M: Serialize,
    S: Serialize,
{
    let report = Report {
        metric,
        stats,
        matrix: full,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CITY_TABLE: &str = "US-NY-NEWYORK,NY,NEW YORK\n\
                              US-IL-CHICAGO,CHI,CHICAGO\n\
                              US-DC-WASHINGTON,,WASHINGTON\n";

    #[test]
    fn city_table_loads_and_skips_empty_fields() {
        let cities = read_city_data(CITY_TABLE.as_bytes()).unwrap();
        assert_eq!(cities.resolve_abbrev("ny").unwrap(), "US-NY-NEWYORK");
        assert_eq!(cities.resolve_name("Chicago").unwrap(), "US-IL-CHICAGO");
        // Washington has no abbreviation entry.
        assert!(cities.resolve_abbrev("WAS").is_err());
        assert_eq!(
            cities.resolve_name("WASHINGTON").unwrap(),
            "US-DC-WASHINGTON"
        );
    }

    #[test]
    fn short_city_lines_fail() {
        assert!(read_city_data("US-NY-NEWYORK,NY".as_bytes()).is_err());
    }

    #[test]
    fn locations_take_the_first_coordinate_pair() {
        let table = "US-NY-NEWYORK\t40.7:-74.0,41.0:-73.5\nUS-CA-LOSANGELES\t34.0:-118.2\n";
        let locations = read_locations(table.as_bytes()).unwrap();
        assert_eq!(
            locations["US-NY-NEWYORK"],
            GeoCoordinate {
                lat: 40.7,
                lon: -74.0
            }
        );
        assert_eq!(locations.len(), 2);
    }

    #[test]
    fn bad_coordinate_lines_fail() {
        assert!(read_locations("US-NY-NEWYORK 40.7:-74.0".as_bytes()).is_err());
        assert!(read_locations("US-NY-NEWYORK\t40.7,-74.0".as_bytes()).is_err());
    }

    fn small_matrix() -> Matrix<i64> {
        let mut matrix = Matrix::new();
        matrix
            .entry("B".to_string())
            .or_insert_with(HashMap::new)
            .insert("A".to_string(), 7);
        matrix
    }

    #[test]
    fn grid_output_is_sorted_and_annotated() {
        let full = complete_matrix(&small_matrix(), NO_DELAY_MS);
        let stats = Stats {
            min: 7i64,
            max: 7i64,
            avg: 7.0,
        };
        let mut buf = Vec::new();
        write_grid(&mut buf, &full, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            ",A,B\nA,0,7\nB,7,0\n#> min./max./avg. : 7, 7, 7\n"
        );
    }

    #[test]
    fn pair_output_skips_missing_cells() {
        let mut matrix = small_matrix();
        matrix
            .entry("B".to_string())
            .or_insert_with(HashMap::new)
            .insert("C".to_string(), NO_DELAY_MS);
        let mut buf = Vec::new();
        write_pairs(&mut buf, &matrix, NO_DELAY_MS).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("B"));
        assert!(text.contains("A"));
        assert!(text.contains('7'));
    }

    #[test]
    fn json_report_carries_metric_stats_and_matrix() {
        let full = complete_matrix(&small_matrix(), NO_DELAY_MS);
        let stats = Stats {
            min: 7i64,
            max: 7i64,
            avg: 7.0,
        };
        let mut buf = Vec::new();
        write_json(&mut buf, "delay", &full, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["metric"], "delay");
        assert_eq!(value["stats"]["min"], 7);
        assert_eq!(value["matrix"]["A"]["B"], 7);
    }
}
