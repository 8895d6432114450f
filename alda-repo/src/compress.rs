//! Transparent decompression of metadata files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::Error;

/// Opens a metadata file for reading, decompressing by file extension.
///
/// Plain and gzipped files are supported; other compression suffixes yield
/// [`Error::UnsupportedCompression`].
pub(crate) fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let extension = path.extension().and_then(|ext| ext.to_str());
    if let Some("bz2" | "xz" | "lzma" | "zst" | "zck") = extension {
        return Err(Error::UnsupportedCompression {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some("gz") = extension {
        Ok(Box::new(BufReader::new(GzDecoder::new(BufReader::new(
            file,
        )))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reads_plain_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("primary.xml");
        std::fs::write(&path, "<metadata/>")?;

        let mut content = String::new();
        open_reader(&path)?.read_to_string(&mut content)?;
        assert_eq!(content, "<metadata/>");
        Ok(())
    }

    #[test]
    fn reads_gzipped_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("primary.xml.gz");
        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"<metadata/>")?;
        encoder.finish()?;

        let mut content = String::new();
        open_reader(&path)?.read_to_string(&mut content)?;
        assert_eq!(content, "<metadata/>");
        Ok(())
    }

    #[test]
    fn rejects_unsupported_compression() {
        assert!(matches!(
            open_reader(Path::new("repodata/primary.xml.zst")),
            Err(Error::UnsupportedCompression { .. })
        ));
    }
}
