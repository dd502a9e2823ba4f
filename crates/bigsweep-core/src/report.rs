/// One-shot export of a scan result as CSV or JSON.
///
/// Rows are written in result order (largest first). Sizes stay raw byte
/// counts; timestamps are RFC 3339 in UTC.
use crate::model::{FileEntry, ScanResult};
use serde::Serialize;
use std::io::Write;

/// Flat row shape shared by both formats.
#[derive(Debug, Serialize)]
struct Row<'a> {
    id: u64,
    path: std::borrow::Cow<'a, str>,
    size: u64,
    modified: String,
}

impl<'a> From<&'a FileEntry> for Row<'a> {
    fn from(e: &'a FileEntry) -> Self {
        Self {
            id: e.id().get(),
            path: e.path().to_string_lossy(),
            size: e.size(),
            modified: e.modified().to_rfc3339(),
        }
    }
}

/// Write `result` as CSV with a header row.
pub fn write_csv<W: Write>(result: &ScanResult, writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for entry in result {
        out.serialize(Row::from(entry))?;
    }
    out.flush()?;
    Ok(())
}

/// Write `result` as a pretty-printed JSON array.
pub fn write_json<W: Write>(result: &ScanResult, writer: W) -> serde_json::Result<()> {
    let rows: Vec<Row<'_>> = result.iter().map(Row::from).collect();
    serde_json::to_writer_pretty(writer, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn sample() -> ScanResult {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        ScanResult::from_discovered(vec![
            FileEntry::new(PathBuf::from("/data/small, with comma.iso"), 150, t),
            FileEntry::new(PathBuf::from("/data/big.mkv"), 300, t),
        ])
    }

    #[test]
    fn csv_has_header_and_largest_first() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,path,size,modified");
        assert!(lines[1].contains("/data/big.mkv,300,2023-11-14T22:13:20+00:00"));
        assert!(lines[2].contains("\"/data/small, with comma.iso\",150"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_is_an_array_of_rows() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["path"], "/data/big.mkv");
        assert_eq!(rows[0]["size"], 300);
        assert_eq!(rows[1]["size"], 150);
    }
}
