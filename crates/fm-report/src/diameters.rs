use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::ReportError;

/// Writes one diameter per line. Values use the shortest representation that
/// reads back to the same `f64`.
pub fn write_diameters<W: Write>(mut writer: W, values: &[f64]) -> Result<(), ReportError> {
    for v in values {
        writeln!(writer, "{v}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_diameters<R: BufRead>(reader: R) -> Result<Vec<f64>, ReportError> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let v: f64 = text.parse().map_err(|_| ReportError::Parse {
            line: i + 1,
            text: text.to_owned(),
        })?;
        out.push(v);
    }
    Ok(out)
}

pub fn save_diameters(path: &Path, values: &[f64]) -> Result<(), ReportError> {
    let file = File::create(path).map_err(ReportError::io_at(path))?;
    write_diameters(BufWriter::new(file), values).map_err(|e| match e {
        ReportError::Io { path: None, source } => ReportError::Io {
            path: Some(path.to_owned()),
            source,
        },
        other => other,
    })?;
    tracing::debug!("wrote {} diameters to {}", values.len(), path.display());
    Ok(())
}

pub fn load_diameters(path: &Path) -> Result<Vec<f64>, ReportError> {
    let file = File::open(path).map_err(ReportError::io_at(path))?;
    read_diameters(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fm_core::ErrorKind;

    use super::{load_diameters, read_diameters, write_diameters};
    use crate::ReportError;

    #[test]
    fn one_value_per_line_without_header() {
        let mut buf = Vec::new();
        write_diameters(&mut buf, &[0.3, 0.296_333_333_333_333_3]).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "0.3\n0.2963333333333333\n");
    }

    #[test]
    fn written_values_read_back_exactly() {
        let values = [42.0 * 25.4 / 3600.0, 0.1 + 0.2, 1e-9];
        let mut buf = Vec::new();
        write_diameters(&mut buf, &values).expect("write");

        let back = read_diameters(Cursor::new(buf)).expect("read");
        assert_eq!(back, values);
    }

    #[test]
    fn legacy_leading_blank_line_is_skipped() {
        let back = read_diameters(Cursor::new("\n0.29\n0.31\n\n")).expect("read");
        assert_eq!(back, vec![0.29, 0.31]);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let err = read_diameters(Cursor::new("0.3\nabc\n")).unwrap_err();
        match err {
            ReportError::Parse { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_resource_unavailable() {
        let err = load_diameters("/nonexistent/dir/diameters.csv".as_ref()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
        assert!(err.to_string().contains("diameters.csv"));
    }
}
