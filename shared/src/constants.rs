/// Cap for one syncable config file's text contents (8 MiB).
pub const MAX_CONFIG_CONTENT_LEN: usize = 8 * 1024 * 1024;

/// Hard ceiling for a decompressed fingerprint blob. Checked before full
/// decode so a malicious peer cannot force an unbounded allocation.
pub const MAX_FINGERPRINT_LEN: usize = 64 * 1024 * 1024;

/// Cap for one command's serialized argument blob.
pub const MAX_ARGS_LEN: usize = 1024 * 1024;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 15;
