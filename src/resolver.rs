// ABOUTME: Supplies the octets of URI-backed body parts, synchronously for the composer
// ABOUTME: or ahead of time with tokio::fs so encoding never blocks on file reads

use crate::body::{PartData, PduBody};
use crate::codec::CodecError;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the data behind a part's URI
pub trait PartDataResolver {
    fn resolve(&self, uri: &str) -> io::Result<Bytes>;
}

impl<F> PartDataResolver for F
where
    F: Fn(&str) -> io::Result<Bytes>,
{
    fn resolve(&self, uri: &str) -> io::Result<Bytes> {
        self(uri)
    }
}

/// Resolves `file:` URIs and bare relative paths under a root directory
#[derive(Clone, Debug)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsResolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PartDataResolver for FsResolver {
    fn resolve(&self, uri: &str) -> io::Result<Bytes> {
        let path = resolve_path(&self.root, uri)?;
        std::fs::read(path).map(Bytes::from)
    }
}

/// Map a part URI onto a path below `root`. Absolute paths and `..`
/// components are refused.
fn resolve_path(root: &Path, uri: &str) -> io::Result<PathBuf> {
    let relative = uri.strip_prefix("file://").unwrap_or(uri);
    let relative = Path::new(relative.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{uri:?} does not name a file below the resolver root"),
        ));
    }
    Ok(root.join(relative))
}

/// Read every URI-backed part under `root` with `tokio::fs`, returning a body
/// whose parts all hold their data in memory
pub async fn prefetch(body: &PduBody, root: &Path) -> Result<PduBody, CodecError> {
    let mut resolved = PduBody::new();
    for part in body.iter() {
        let part = match part.data() {
            PartData::Bytes(_) => part.clone(),
            PartData::Uri(uri) => {
                let path = resolve_path(root, uri).map_err(|source| CodecError::PartData {
                    location: uri.clone(),
                    source,
                })?;
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|source| CodecError::PartData {
                        location: uri.clone(),
                        source,
                    })?;
                debug!(%uri, len = data.len(), "prefetched part data");
                part.clone().with_data(Bytes::from(data))
            }
        };
        resolved.add_part(part);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_stay_below_root() {
        let root = Path::new("/srv/parts");
        assert_eq!(
            resolve_path(root, "file:///img/a.jpg").unwrap(),
            root.join("img/a.jpg")
        );
        assert_eq!(resolve_path(root, "b.txt").unwrap(), root.join("b.txt"));
        assert!(resolve_path(root, "../etc/passwd").is_err());
        assert!(resolve_path(root, "").is_err());
    }

    #[test]
    fn closures_resolve() {
        let resolver = |uri: &str| -> io::Result<Bytes> { Ok(Bytes::from(uri.to_uppercase())) };
        assert_eq!(resolver.resolve("abc").unwrap(), Bytes::from("ABC"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let resolver = FsResolver::new(std::env::temp_dir());
        let err = resolver.resolve("mms-pdu-no-such-file.bin").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
