use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::{TraceHash, TraceInfo};
use crate::trace::TraceError;

/// Raw trace context used during analysis.
///
/// Holds the exact bytes analyzed and a cryptographic fingerprint that
/// uniquely identifies the trace.
#[derive(Debug, Clone)]
pub struct TraceContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    /// Exact bytes read from disk.
    pub bytes: Vec<u8>,

    /// Size of the trace in bytes.
    pub size_bytes: u64,

    /// Hash algorithm used for fingerprinting.
    pub hash_alg: String,

    /// Hex-encoded hash of the trace bytes.
    pub hash_hex: String,
}

impl TraceContext {
    /// Convert into the public, report-facing trace metadata.
    ///
    /// This intentionally drops raw bytes to prevent reuse after analysis.
    pub fn into_trace_info(self) -> TraceInfo {
        TraceInfo {
            path: self.path,
            size_bytes: self.size_bytes,
            hash: TraceHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        }
    }
}

/// Read a capture trace and compute a stable cryptographic identity.
///
/// The identity depends **only** on the file bytes. Filesystem metadata
/// (timestamps, permissions, etc.) are ignored to preserve
/// deterministic analysis results.
pub fn read_trace(path: &Path) -> Result<TraceContext, TraceError> {
    let bytes = fs::read(path)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    Ok(TraceContext {
        path: Some(path.display().to_string()),
        size_bytes: bytes.len() as u64,
        bytes,
        hash_alg: "sha256".to_string(),
        hash_hex: hex::encode(digest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_trace(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_bytes_and_computes_stable_hash() {
        let data = b"wirecheck-test";
        let file = temp_trace(data);

        let ctx = read_trace(file.path()).expect("trace read succeeds");

        assert_eq!(ctx.bytes, data);
        assert_eq!(ctx.size_bytes, data.len() as u64);
        assert_eq!(ctx.hash_alg, "sha256");
        assert_eq!(ctx.hash_hex.len(), 64);
        assert!(ctx.hash_hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_inputs_produce_different_hashes() {
        let a = read_trace(temp_trace(b"data-a").path()).unwrap();
        let b = read_trace(temp_trace(b"data-b").path()).unwrap();

        assert_ne!(a.hash_hex, b.hash_hex);
    }

    #[test]
    fn identical_inputs_produce_identical_hashes() {
        let a = read_trace(temp_trace(b"same").path()).unwrap();
        let b = read_trace(temp_trace(b"same").path()).unwrap();

        assert_eq!(a.hash_hex, b.hash_hex);
    }

    #[test]
    fn missing_file_returns_error() {
        let result = read_trace(Path::new("non_existent.trace.json"));
        assert!(matches!(result, Err(TraceError::Io(_))));
    }

    #[test]
    fn converts_to_report_trace_info() {
        let ctx = TraceContext {
            path: Some("capture.json".into()),
            bytes: vec![0x7b, 0x7d],
            size_bytes: 2,
            hash_alg: "sha256".into(),
            hash_hex: "abcd".into(),
        };

        let info = ctx.into_trace_info();
        assert_eq!(info.path, Some("capture.json".into()));
        assert_eq!(info.hash.value, "abcd");
    }
}
