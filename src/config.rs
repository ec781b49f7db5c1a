use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const VENDOR: &str = "Cisco";
pub const PRODUCT: &str = "smartnic";
pub const PRODUCT_PRETTY: &str = "Nexus SmartNIC";
pub const COMPRESSED_SUFFIX: &str = "gz";
pub const ISSUES_URL: &str = "https://github.com/exablaze-oss/exanic-debug-dump/issues";

/// Facts about the host that feed the default dump location.
#[derive(Debug, Clone)]
pub struct HostContext {
    /// Only needed when no output path is given.
    pub home: Option<PathBuf>,
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
}

impl HostContext {
    /// Read home directory, host name and the current UTC time once.
    pub fn detect() -> Self {
        let home = dirs::home_dir();
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".into());

        Self {
            home,
            hostname,
            timestamp: Utc::now(),
        }
    }
}

/// `2021-05-04-13H05M09.123456`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%F-%HH%MM%S.%6f").to_string()
}

pub fn default_dump_filename(host: &HostContext) -> String {
    format!(
        "{}_{}_debug_dump_{}.log",
        host.hostname,
        PRODUCT,
        format_timestamp(&host.timestamp)
    )
}

/// Where the dump and its compressed sibling live for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPaths {
    pub dump: PathBuf,
    pub compressed: PathBuf,
}

impl DumpPaths {
    /// An explicit `output` is used verbatim; otherwise the dump goes into
    /// the home directory, which then has to be known.
    pub fn resolve(output: Option<&Path>, host: &HostContext) -> Result<Self> {
        let dump = match output {
            Some(path) => path.to_path_buf(),
            None => host
                .home
                .as_deref()
                .context("could not determine home directory")?
                .join(default_dump_filename(host)),
        };
        let compressed = with_suffix(&dump, COMPRESSED_SUFFIX);
        Ok(Self { dump, compressed })
    }

    /// The path reported to the user once the run is over.
    pub fn final_path(&self, compress: bool) -> &Path {
        if compress {
            &self.compressed
        } else {
            &self.dump
        }
    }
}

/// Append `.suffix` to the whole file name, keeping any existing extension.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
