use crate::dataset::{Dataset, Observation};

use log::{debug, warn};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str;

/// Why a single input line was dropped. Never fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected 2 comma separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("{field} value {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} value {value:?} is not finite")]
    NonFinite { field: &'static str, value: String },
    #[error("{field} is not valid UTF-8")]
    Encoding { field: &'static str },
}

/// The input stream itself could not be read. Aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub line: u64,
    pub content: String,
    pub reason: RecordError,
}

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub dataset: Dataset,
    pub skipped: Vec<SkippedRecord>,
}

pub fn mk_rdr<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .quoting(false)
        .from_reader(input)
}

pub fn read_dataset_file<P: AsRef<Path>>(path: P) -> Result<ParseOutcome, DatasetError> {
    let file = File::open(path)?;
    read_dataset(file)
}

/// Reads "x,y" lines. Bad lines are logged and skipped, only a failure of the
/// underlying reader is returned as an error.
pub fn read_dataset<R: Read>(input: R) -> Result<ParseOutcome, DatasetError> {
    let mut rdr = mk_rdr(input);
    let mut observations = Vec::new();
    let mut skipped = Vec::new();

    for result in rdr.byte_records() {
        let record = result.map_err(io::Error::from)?;
        match parse_record(&record) {
            Ok(obs) => observations.push(obs),
            Err(reason) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let content = record_content(&record);
                warn!("discarding bad data point {:?} on line {}: {}", content, line, reason);
                skipped.push(SkippedRecord { line, content, reason });
            },
        }
    }
    debug!("parsed {} observations, skipped {}", observations.len(), skipped.len());

    Ok(ParseOutcome { dataset: observations.into_iter().collect(), skipped })
}

pub fn parse_record(record: &csv::ByteRecord) -> Result<Observation, RecordError> {
    if record.len() != 2 {
        return Err(RecordError::FieldCount { found: record.len() });
    }
    let x = parse_field("x", &record[0])?;
    let y = parse_field("y", &record[1])?;
    Ok(Observation { x, y })
}

fn parse_field(field: &'static str, raw: &[u8]) -> Result<f64, RecordError> {
    let text = str::from_utf8(raw).map_err(|_| RecordError::Encoding { field })?;
    let value: f64 = text
        .parse()
        .map_err(|_| RecordError::InvalidNumber { field, value: text.to_owned() })?;
    if !value.is_finite() {
        return Err(RecordError::NonFinite { field, value: text.to_owned() });
    }
    Ok(value)
}

fn record_content(record: &csv::ByteRecord) -> String {
    record.iter().map(String::from_utf8_lossy).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stream unavailable"))
        }
    }

    #[test]
    fn test_all_valid_lines_kept_in_order() {
        let input = "1,5\n2.5,7\n-3,-3.25\n0,1e2\n";
        let out = read_dataset(input.as_bytes()).unwrap();
        assert_eq!(out.dataset.len(), 4);
        assert!(out.skipped.is_empty());
        assert_eq!(out.dataset.xs(), vec![1.0, 2.5, -3.0, 0.0]);
        assert_eq!(out.dataset.ys(), vec![5.0, 7.0, -3.25, 100.0]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = "1,2\nfoo,3\n2,4\n5\n3,6\n1,2,3\n4,bar\n";
        let out = read_dataset(input.as_bytes()).unwrap();
        // 7 lines, 4 malformed
        assert_eq!(out.dataset.len(), 3);
        assert_eq!(out.skipped.len(), 4);
        assert_eq!(out.dataset.xs(), vec![1.0, 2.0, 3.0]);

        assert_eq!(out.skipped[0].line, 2);
        assert_eq!(out.skipped[0].content, "foo,3");
        assert_eq!(
            out.skipped[0].reason,
            RecordError::InvalidNumber { field: "x", value: "foo".to_owned() }
        );
        assert_eq!(out.skipped[1].reason, RecordError::FieldCount { found: 1 });
        assert_eq!(out.skipped[2].reason, RecordError::FieldCount { found: 3 });
        assert_eq!(
            out.skipped[3].reason,
            RecordError::InvalidNumber { field: "y", value: "bar".to_owned() }
        );
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let input = "NaN,1\n1,inf\n-inf,2\n2,3\n";
        let out = read_dataset(input.as_bytes()).unwrap();
        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.skipped.len(), 3);
        assert!(out.skipped.iter().all(|s| matches!(s.reason, RecordError::NonFinite { .. })));
    }

    #[test]
    fn test_stray_quote_only_drops_its_own_line() {
        let input = "1,2\n\"3,4\n5,6\n7,8\n";
        let out = read_dataset(input.as_bytes()).unwrap();
        // 4 lines, 1 malformed
        assert_eq!(out.dataset.len(), 3);
        assert_eq!(out.dataset.xs(), vec![1.0, 5.0, 7.0]);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].line, 2);
        assert_eq!(out.skipped[0].content, "\"3,4");
        assert_eq!(
            out.skipped[0].reason,
            RecordError::InvalidNumber { field: "x", value: "\"3".to_owned() }
        );
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let input = " 1 , 2 \n3,\t4\n";
        let out = read_dataset(input.as_bytes()).unwrap();
        assert_eq!(out.dataset.xs(), vec![1.0, 3.0]);
        assert_eq!(out.dataset.ys(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_invalid_utf8_is_a_record_error() {
        let input: &[u8] = b"1,\xff\n2,3\n";
        let out = read_dataset(input).unwrap();
        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.skipped[0].reason, RecordError::Encoding { field: "y" });
    }

    #[test]
    fn test_empty_and_all_bad_input_give_empty_dataset() {
        let out = read_dataset("".as_bytes()).unwrap();
        assert!(out.dataset.is_empty());

        let out = read_dataset("a,b\nc\n".as_bytes()).unwrap();
        assert!(out.dataset.is_empty());
        assert_eq!(out.skipped.len(), 2);
    }

    #[test]
    fn test_stream_failure_is_fatal() {
        let res = read_dataset(BrokenReader);
        assert!(matches!(res, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_dataset_file(dir.path().join("nope.txt"));
        assert!(matches!(res, Err(DatasetError::Io(_))));
    }
}
