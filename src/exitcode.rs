//! Process exit codes.

use crate::domain::Summary;

/// Every file converted, or nothing to convert.
pub const OK: i32 = 0;

/// Bad command line, missing source directory, unusable output directory or
/// config file.
pub const USAGE: i32 = 1;

/// The run finished but at least one file failed.
pub const PARTIAL: i32 = 2;

pub fn for_summary(summary: &Summary) -> i32 {
    if summary.is_clean() { OK } else { PARTIAL }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_or_empty_runs_exit_ok() {
        assert_eq!(for_summary(&Summary::default()), OK);
        assert_eq!(for_summary(&Summary { succeeded: 3, failed: 0 }), OK);
    }

    #[test]
    fn any_failed_file_exits_partial() {
        assert_eq!(for_summary(&Summary { succeeded: 1, failed: 1 }), PARTIAL);
        assert_eq!(for_summary(&Summary { succeeded: 0, failed: 2 }), PARTIAL);
    }

    #[test]
    fn codes_are_distinct() {
        assert_ne!(OK, USAGE);
        assert_ne!(USAGE, PARTIAL);
    }
}
