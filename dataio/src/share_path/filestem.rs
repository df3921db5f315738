//! File stem construction.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::{invalid, Result};

const SEPARATOR: &str = "--";

/// Inputs to [`build_filestem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilestemParts<'a> {
    /// Object name, mandatory.
    pub name: &'a str,
    /// Tag name.
    pub tagname: &'a str,
    /// Parent name.
    pub parent: &'a str,
    /// Older date as `YYYYMMDD`.
    pub time0: Option<&'a str>,
    /// Newer date as `YYYYMMDD`.
    pub time1: Option<&'a str>,
    /// Render the older date first.
    pub reverse: bool,
}

/// Builds the file stem `parent--name--tagname--time`.
///
/// Empty parts are skipped. The result is lowercase, dots and spaces become
/// underscores, runs of underscores collapse and Norwegian letters are
/// transliterated.
pub fn build_filestem(parts: &FilestemParts<'_>, sink: &dyn DiagnosticSink) -> Result<String> {
    if parts.name.is_empty() {
        return Err(invalid(
            "name",
            "The 'name' entry is missing for constructing a file name",
        ));
    }
    let time = time_part(parts, sink)?;

    let stem = [parts.parent, parts.name, parts.tagname, time.as_deref().unwrap_or_default()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    Ok(sanitize(&stem))
}

fn time_part(parts: &FilestemParts<'_>, sink: &dyn DiagnosticSink) -> Result<Option<String>> {
    match (parts.time0, parts.time1) {
        (None, Some(_)) => Err(invalid(
            "timedata",
            "Not legal: 'time0' is missing while 'time1' is present",
        )),
        (None, None) => Ok(None),
        (Some(t0), None) => Ok(Some(t0.to_string())),
        (Some(base), Some(monitor)) => {
            if base == monitor {
                sink.emit(Diagnostic::warning("The monitor date and base date are equal"));
            }
            Ok(Some(if parts.reverse {
                format!("{base}_{monitor}")
            } else {
                format!("{monitor}_{base}")
            }))
        }
    }
}

fn sanitize(stem: &str) -> String {
    let mut out = stem.to_lowercase().replace(['.', ' '], "_");
    while out.contains("__") {
        out = out.replace("__", "_");
    }
    out.replace('æ', "ae").replace('ø', "oe").replace('å', "aa")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticSink;

    fn parts(name: &str) -> FilestemParts<'_> {
        FilestemParts {
            name,
            ..FilestemParts::default()
        }
    }

    #[test]
    fn test_name_and_tag() {
        let sink = CollectingDiagnosticSink::new();
        let p = FilestemParts {
            tagname: "DS_extract",
            ..parts("TopVolantis")
        };
        assert_eq!(build_filestem(&p, &sink).unwrap(), "topvolantis--ds_extract");

        let p = FilestemParts {
            tagname: "DS Extract",
            ..parts("Valysar Top.Fm")
        };
        assert_eq!(build_filestem(&p, &sink).unwrap(), "valysar_top_fm--ds_extract");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_parent_and_sanitizing() {
        let sink = CollectingDiagnosticSink::new();
        let p = FilestemParts {
            parent: "Geogrid",
            ..parts("Valysar Fm.  ÆØÅ")
        };
        assert_eq!(build_filestem(&p, &sink).unwrap(), "geogrid--valysar_fm_aeoeaa");
    }

    #[test]
    fn test_time_parts() {
        let sink = CollectingDiagnosticSink::new();
        let single = FilestemParts {
            time0: Some("20200101"),
            ..parts("x")
        };
        assert_eq!(build_filestem(&single, &sink).unwrap(), "x--20200101");

        let pair = FilestemParts {
            time1: Some("20210101"),
            ..single
        };
        assert_eq!(build_filestem(&pair, &sink).unwrap(), "x--20210101_20200101");

        let reversed = FilestemParts { reverse: true, ..pair };
        assert_eq!(build_filestem(&reversed, &sink).unwrap(), "x--20200101_20210101");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_equal_dates_warn() {
        let sink = CollectingDiagnosticSink::new();
        let p = FilestemParts {
            time0: Some("20200101"),
            time1: Some("20200101"),
            ..parts("x")
        };
        build_filestem(&p, &sink).unwrap();
        assert!(sink.contains("monitor date and base date are equal"));
    }

    #[test]
    fn test_failures() {
        let sink = CollectingDiagnosticSink::new();
        let err = build_filestem(&parts(""), &sink).unwrap_err();
        assert!(err.to_string().contains("'name' entry is missing"));

        let p = FilestemParts {
            time1: Some("20200101"),
            ..parts("x")
        };
        assert!(build_filestem(&p, &sink).unwrap_err().is_validation());
    }
}
