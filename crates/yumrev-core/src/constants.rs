/// Field separator placed between `--qf` tags; chosen so it never shows up in
/// package metadata.
pub const DELIMITER: &str = "<=>";

/// Value repoquery prints for an unset tag.
pub const NONE_TAG: &str = "NONE";

/// Annotation key holding the package location inside the repository.
pub const PACKAGE_LOCATION: &str = "LOCATION";

/// Number of delimited fields in each output line.
pub const FIELD_COUNT: usize = 9;

/// Tags requested from repoquery, in output order.
pub const QUERY_TAGS: [&str; FIELD_COUNT] = [
    "%{RELATIVEPATH}",
    "%{NAME}",
    "%{VERSION}",
    "%{RELEASE}",
    "%{ARCH}",
    "%{BUILDTIME}",
    "%{PACKAGER}",
    "%{LOCATION}",
    "%{URL}",
];

/// The `--qf` argument matching [`QUERY_TAGS`].
pub fn query_format() -> String {
    QUERY_TAGS.join(DELIMITER)
}
