//! Plain text input and output.
//!
//! Segments are read from a file whose first line holds the number of
//! segments, followed by one `x1 y1 x2 y2` line per segment. Points are
//! read from a whitespace separated file starting with the number of
//! points, followed by their coordinates.
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use geo::Coordinate;
use log::{debug, warn};

use crate::{
    crossings::Crossings,
    error::{Error, Result},
    segment::Segment,
};

/// Read the segments file at `path`.
pub fn read_segments<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    parse_segments(BufReader::new(file), path)
}

/// Parse a segments file; `path` is only used in messages.
///
/// Line `i` after the header describes the segment with index `i`. A
/// line that does not hold exactly four finite numbers is skipped, but
/// still uses up its index.
pub fn parse_segments<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Segment>> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line.map_err(|e| Error::io(path, e))?,
        None => String::new(),
    };
    let count: usize = header.trim().parse().map_err(|_| Error::Header {
        path: path.into(),
        line: header.clone(),
    })?;

    let mut segments = Vec::with_capacity(count);
    for index in 0..count {
        let line = match lines.next() {
            Some(line) => line.map_err(|e| Error::io(path, e))?,
            None => {
                warn!(
                    "{}: expected {} segments, found only {} lines",
                    path.display(),
                    count,
                    index
                );
                break;
            }
        };
        match parse_segment_line(&line) {
            Some([x1, y1, x2, y2]) => {
                segments.push(Segment::new(
                    Coordinate { x: x1, y: y1 },
                    Coordinate { x: x2, y: y2 },
                    index,
                ));
            }
            None => warn!(
                "{}:{}: skipping malformed segment {:?}",
                path.display(),
                index + 2,
                line
            ),
        }
    }
    debug!("read {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

fn parse_segment_line(line: &str) -> Option<[f64; 4]> {
    let mut coords = [0.; 4];
    let mut tokens = line.split_whitespace();
    for c in coords.iter_mut() {
        *c = tokens.next()?.parse().ok().filter(|v: &f64| v.is_finite())?;
    }
    match tokens.next() {
        Some(_) => None,
        None => Some(coords),
    }
}

/// Read the points file at `path`.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Coordinate<f64>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    parse_points(BufReader::new(file), path)
}

/// Parse a points file; `path` is only used in messages.
///
/// Any token that is not a number is an error. If the file holds fewer
/// coordinates than announced, the complete pairs are kept.
pub fn parse_points<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Coordinate<f64>>> {
    let mut count: Option<usize> = None;
    let mut values = vec![];

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        for token in line.split_whitespace() {
            let expected = match count {
                Some(k) => 2 * k,
                None => {
                    let k = token.parse().map_err(|_| Error::Header {
                        path: path.into(),
                        line: line.clone(),
                    })?;
                    count = Some(k);
                    values.reserve(2 * k);
                    continue;
                }
            };
            if values.len() == expected {
                debug!("{}:{}: ignoring trailing values", path.display(), i + 1);
                break;
            }
            let value: f64 = token.parse().map_err(|_| Error::Parse {
                path: path.into(),
                line: i + 1,
                token: token.into(),
            })?;
            values.push(value);
        }
    }

    let count = count.ok_or_else(|| Error::Header {
        path: path.into(),
        line: String::new(),
    })?;
    if values.len() < 2 * count {
        warn!(
            "{}: expected {} points, found {} values",
            path.display(),
            count,
            values.len()
        );
    }
    Ok(values
        .chunks_exact(2)
        .map(|c| Coordinate { x: c[0], y: c[1] })
        .collect())
}

/// Write the intersection report: a header line, then one `(x, y)`
/// line per distinct point rounded to `digits` decimals.
pub fn write_report<W: Write>(mut out: W, crossings: &Crossings, digits: usize) -> io::Result<()> {
    writeln!(out, "Unique intersection points:")?;
    for (x, y) in crossings.rounded_points(digits) {
        writeln!(out, "({:.*}, {:.*})", digits, x, digits, y)?;
    }
    out.flush()
}

/// Write the intersection report to the file at `path`.
pub fn write_report_file<P: AsRef<Path>>(path: P, crossings: &Crossings, digits: usize) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_report(BufWriter::new(file), crossings, digits).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::Line;

    use super::*;
    use crate::{config::SweepConfig, crossings::find_crossings};

    fn path() -> &'static Path {
        Path::new("test.txt")
    }

    #[test]
    fn test_parse_segments() {
        let text = "4\n0 0 2 2\n0 2 2 0\n1 oops 2 3\n3 3 1 1\n";
        let segments = parse_segments(text.as_bytes(), path()).unwrap();
        let indices: Vec<_> = segments.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 3]);

        // End points are ordered.
        assert_relative_eq!(segments[2].start().x(), 1.);
        assert_relative_eq!(segments[2].end().y(), 3.);
    }

    #[test]
    fn test_parse_segments_malformed_lines() {
        let text = "5\n0 0 1 1\n\n0 0 1\n0 0 1 1 1\n0 0 inf 1\n";
        let segments = parse_segments(text.as_bytes(), path()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index(), 0);

        // Fewer lines than announced.
        let segments = parse_segments("3\n0 0 1 1\n".as_bytes(), path()).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_segments_header() {
        for text in ["", "\n0 0 1 1\n", "two\n0 0 1 1\n", "-1\n"] {
            match parse_segments(text.as_bytes(), path()) {
                Err(Error::Header { .. }) => {}
                other => panic!("{:?}: expected header error, got {:?}", text, other),
            }
        }
        assert!(parse_segments(" 0 \n".as_bytes(), path()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points("3\n1 2\n3.5 -4\n5 6 7 8\n".as_bytes(), path()).unwrap();
        assert_eq!(
            points,
            vec![
                Coordinate { x: 1., y: 2. },
                Coordinate { x: 3.5, y: -4. },
                Coordinate { x: 5., y: 6. },
            ]
        );

        // Incomplete pairs are dropped.
        let points = parse_points("2 1 2 3".as_bytes(), path()).unwrap();
        assert_eq!(points, vec![Coordinate { x: 1., y: 2. }]);
    }

    #[test]
    fn test_points_errors() {
        assert!(matches!(
            parse_points("".as_bytes(), path()),
            Err(Error::Header { .. })
        ));
        assert!(matches!(
            parse_points("x 1 2".as_bytes(), path()),
            Err(Error::Header { .. })
        ));
        match parse_points("2\n1 2\n3 y\n".as_bytes(), path()) {
            Err(Error::Parse { line, token, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "y");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_segments("/nonexistent/segments.txt").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("/nonexistent/segments.txt"));
    }

    #[test]
    fn test_write_report() {
        let input = vec![
            Line::from([(0., 0.), (2., 2.)]),
            Line::from([(0., 2.), (2., 0.)]),
            Line::from([(0., 0.), (3., 1.)]),
            Line::from([(0., 1.), (3., 0.)]),
        ];
        let crossings = find_crossings(input, &SweepConfig::default());
        let mut out = vec![];
        write_report(&mut out, &crossings, 3).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Unique intersection points:\n\
             (0.000, 0.000)\n\
             (0.750, 0.750)\n\
             (1.000, 1.000)\n\
             (1.500, 0.500)\n"
        );

        let mut out = vec![];
        write_report(&mut out, &Crossings::default(), 3).unwrap();
        assert_eq!(out, b"Unique intersection points:\n");
    }
}
