//! Classification and decoding of repoquery output.

use tracing::{info, warn};

use crate::{
    build_time::parse_build_time,
    constants::{DELIMITER, FIELD_COUNT, NONE_TAG, PACKAGE_LOCATION},
    error::QueryError,
    params::RepoQueryParams,
    process::ProcessOutput,
    revision::PackageRevision,
    QueryResult,
};

/// A run counts as successful only with a zero exit code, some stdout and
/// nothing on stderr.
pub fn is_successful(output: &ProcessOutput) -> bool {
    output.is_zero_return_code() && output.has_output() && !output.has_errors()
}

/// Turns a finished repoquery run into a [`PackageRevision`].
pub fn parse_process_output(
    params: &RepoQueryParams,
    output: &ProcessOutput,
) -> QueryResult<PackageRevision> {
    if !is_successful(output) {
        let err = QueryError::Execution {
            repo_url: params.display_url().to_string(),
            package_spec: params.package_spec().to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr_as_string(),
        };
        info!("{}", err);
        return Err(err);
    }

    parse_output(params.package_spec(), &output.stdout)
}

/// Decodes the stdout lines of a successful run.
///
/// Lines are counted as given: a blank line still counts toward the
/// ambiguity check.
pub fn parse_output(package_spec: &str, stdout: &[String]) -> QueryResult<PackageRevision> {
    if stdout.len() > 1 {
        let files = stdout
            .iter()
            .map(|line| file_name(first_field(line)).to_string())
            .collect();
        let err = QueryError::AmbiguousPackage {
            package_spec: package_spec.to_string(),
            files,
        };
        info!("{}", err);
        return Err(err);
    }

    let line = stdout.first().map(String::as_str).unwrap_or_default();
    parse_line(line)
}

fn first_field(line: &str) -> &str {
    line.split(DELIMITER).next().unwrap_or(line)
}

fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

fn package_tag_value(input: &str) -> Option<String> {
    if input.eq_ignore_ascii_case(NONE_TAG) {
        None
    } else {
        Some(input.to_string())
    }
}

/// Decodes a single `<=>` delimited line.
pub fn parse_line(line: &str) -> QueryResult<PackageRevision> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() < FIELD_COUNT {
        return Err(QueryError::MalformedOutput {
            line: line.to_string(),
            found: parts.len(),
        });
    }

    let (name, version, release, arch) = (parts[1], parts[2], parts[3], parts[4]);
    let build_time = parts[5];
    let packager = package_tag_value(parts[6]);
    let location = package_tag_value(parts[7]);
    let trackback_url = package_tag_value(parts[8]);

    let package_name = format!("{name}-{version}-{release}.{arch}");
    let timestamp = parse_build_time(build_time)?;

    let mut revision = PackageRevision::new(package_name, timestamp, packager, trackback_url);
    if let Err(err) = revision.add_data(PACKAGE_LOCATION, location.as_deref()) {
        warn!("Could not add data key. Reason : {}", err);
    }

    Ok(revision)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const LINE: &str = "a/b/pkg.rpm<=>pkg<=>1.2<=>3<=>x86_64<=>1609459200<=>NONE<=>NONE<=>NONE";

    fn params() -> RepoQueryParams {
        RepoQueryParams::new("base", "file:///srv/base", "pkg")
            .with_display_url("https://mirror.example.com/base")
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_single_line() {
        let revision = parse_output("pkg", &lines(&[LINE])).unwrap();

        assert_eq!(revision.name(), "pkg-1.2-3.x86_64");
        assert_eq!(
            revision.timestamp(),
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(revision.packager(), None);
        assert_eq!(revision.trackback_url(), None);
        assert_eq!(revision.data().get(PACKAGE_LOCATION), None);
    }

    #[test]
    fn test_parse_populated_fields() {
        let line = "Packages/g/go-agent-22.1.0-1.noarch.rpm<=>go-agent<=>22.1.0<=>1<=>noarch<=>2023-05-07 9:30<=>ThoughtWorks<=>Packages/g/go-agent-22.1.0-1.noarch.rpm<=>https://www.gocd.org";
        let revision = parse_line(line).unwrap();

        assert_eq!(revision.name(), "go-agent-22.1.0-1.noarch");
        assert_eq!(
            revision.timestamp(),
            Utc.with_ymd_and_hms(2023, 5, 7, 9, 30, 0).unwrap()
        );
        assert_eq!(revision.packager(), Some("ThoughtWorks"));
        assert_eq!(revision.trackback_url(), Some("https://www.gocd.org"));
        assert_eq!(
            revision.data().get(PACKAGE_LOCATION),
            Some("Packages/g/go-agent-22.1.0-1.noarch.rpm")
        );
    }

    #[test]
    fn test_none_is_case_insensitive() {
        for none in ["none", "NONE", "None", "nOnE"] {
            let line = format!("p.rpm<=>p<=>1<=>1<=>noarch<=>0<=>{none}<=>{none}<=>{none}");
            let revision = parse_line(&line).unwrap();
            assert_eq!(revision.packager(), None);
            assert_eq!(revision.trackback_url(), None);
            assert!(revision.data().is_empty());
        }

        assert_eq!(package_tag_value("NONEX"), Some("NONEX".to_string()));
    }

    #[test]
    fn test_multiple_lines_are_ambiguous() {
        let stdout = lines(&[
            "a/b/pkg-1.rpm<=>pkg<=>1<=>1<=>x86_64<=>0<=>NONE<=>NONE<=>NONE",
            "c/pkg-2.rpm<=>pkg<=>2<=>1<=>x86_64<=>0<=>NONE<=>NONE<=>NONE",
            "pkg-3.rpm<=>pkg<=>3<=>1<=>x86_64<=>0<=>NONE<=>NONE<=>NONE",
        ]);

        match parse_output("pkg", &stdout).unwrap_err() {
            QueryError::AmbiguousPackage {
                package_spec,
                files,
            } => {
                assert_eq!(package_spec, "pkg");
                assert_eq!(files, ["pkg-1.rpm", "pkg-2.rpm", "pkg-3.rpm"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_blank_line_counts_as_ambiguous() {
        let stdout = lines(&[LINE, ""]);

        match parse_output("pkg", &stdout).unwrap_err() {
            QueryError::AmbiguousPackage { files, .. } => assert_eq!(files, ["pkg.rpm", ""]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = parse_line("a/b/pkg.rpm<=>pkg<=>1.2").unwrap_err();
        assert!(matches!(err, QueryError::MalformedOutput { found: 3, .. }));
    }

    #[test]
    fn test_bad_build_time() {
        for build_time in ["not-a-date", "2023-13-99 9:30"] {
            let line = format!("p.rpm<=>p<=>1<=>1<=>noarch<=>{build_time}<=>NONE<=>NONE<=>NONE");
            assert!(matches!(
                parse_line(&line),
                Err(QueryError::UnparseableTimestamp { .. })
            ));
        }
    }

    #[test]
    fn test_unsuccessful_runs_fail_with_execution_error() {
        let cases = [
            ProcessOutput::new(1, lines(&[LINE]), vec![]),
            ProcessOutput::new(0, lines(&[LINE]), lines(&["warning: metadata expired"])),
            ProcessOutput::new(0, vec![], vec![]),
        ];

        for output in cases {
            match parse_process_output(&params(), &output).unwrap_err() {
                QueryError::Execution {
                    repo_url,
                    package_spec,
                    stderr,
                    exit_code,
                } => {
                    assert_eq!(repo_url, "https://mirror.example.com/base");
                    assert_eq!(package_spec, "pkg");
                    assert_eq!(stderr, output.stderr_as_string());
                    assert_eq!(exit_code, output.exit_code);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let output = ProcessOutput::new(0, lines(&[LINE]), vec![]);
        let first = parse_process_output(&params(), &output).unwrap();
        let second = parse_process_output(&params(), &output).unwrap();
        assert_eq!(first, second);
    }
}
