//! Shared constants used across bucket-unzip crates.

/// Root of the ephemeral scratch tree on the execution environment.
pub const ARTIFACT_ROOT: &str = "/tmp/artifact";

/// Subtree under the artifact root holding downloaded archives.
pub const ZIPPED_SUBDIR: &str = "zipped";

/// Subtree under the artifact root holding extracted content.
pub const UNZIPPED_SUBDIR: &str = "unzipped";

/// File name given to the downloaded archive inside its run directory.
pub const ARCHIVE_FILE_NAME: &str = "temp.zip";

/// Mode bits for scratch directories (fully open within the sandbox).
pub const SCRATCH_DIR_MODE: u32 = 0o777;

/// Environment variable naming the destination bucket for extracted files.
pub const DEST_BUCKET_ENV_VAR: &str = "UNZIPPED_ARTIFACT_BUCKET";
