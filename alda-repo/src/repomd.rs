//! Parsing of `repomd.xml`.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::Error;
use crate::compress::open_reader;

/// One `<data>` record of a `repomd.xml` file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepomdRecord {
    /// The metadata type, e.g. `primary` or `filelists`.
    pub mdtype: String,
    /// The location of the metadata file, relative to the repository root.
    pub location_href: String,
}

/// The index of a repository's metadata files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Repomd {
    records: Vec<RepomdRecord>,
}

impl Repomd {
    /// Returns the record for the given metadata type, if present.
    pub fn record(&self, mdtype: &str) -> Option<&RepomdRecord> {
        self.records.iter().find(|record| record.mdtype == mdtype)
    }

    /// Returns all records.
    pub fn records(&self) -> &[RepomdRecord] {
        &self.records
    }
}

fn attribute(element: &BytesStart, name: &[u8], path: &Path) -> Result<Option<String>, Error> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::MalformedMetadata {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Reads a `repomd.xml` file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid repomd XML.
pub fn read_repomd(path: &Path) -> Result<Repomd, Error> {
    let mut reader = Reader::from_reader(open_reader(path)?);
    let mut buf = Vec::new();

    let mut records = Vec::new();
    let mut mdtype: Option<String> = None;
    let mut href: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) if element.local_name().as_ref() == b"data" => {
                mdtype = attribute(&element, b"type", path)?;
                href = None;
            }
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == b"location" =>
            {
                href = attribute(&element, b"href", path)?;
            }
            Event::End(element) if element.local_name().as_ref() == b"data" => {
                match (mdtype.take(), href.take()) {
                    (Some(mdtype), Some(location_href)) => records.push(RepomdRecord {
                        mdtype,
                        location_href,
                    }),
                    (Some(mdtype), None) => {
                        return Err(Error::MalformedMetadata {
                            path: path.to_path_buf(),
                            reason: format!("data record '{mdtype}' has no location"),
                        });
                    }
                    (None, _) => {
                        return Err(Error::MalformedMetadata {
                            path: path.to_path_buf(),
                            reason: "data record has no type".to_string(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Repomd { records })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REPOMD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <revision>1337</revision>
  <data type="primary">
    <checksum type="sha256">dc8eb477b0ec62a15663f7c16068117dff0e50fdbb7b10a5d44d38d5ab1cf6de</checksum>
    <location href="repodata/primary.xml.gz"/>
    <timestamp>1334667230</timestamp>
    <size>2481</size>
  </data>
  <data type="filelists">
    <checksum type="sha256">0c1e4021b2f2f439518532eaf3007a56b75eed12e56bddbc375a4dea2a4a4986</checksum>
    <location href="repodata/filelists.xml.gz"/>
  </data>
</repomd>
"#;

    #[test]
    fn parses_records() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("repomd.xml");
        std::fs::write(&path, REPOMD)?;

        let repomd = read_repomd(&path)?;
        assert_eq!(repomd.records().len(), 2);
        assert_eq!(
            repomd.record("primary").map(|r| r.location_href.as_str()),
            Some("repodata/primary.xml.gz")
        );
        assert_eq!(
            repomd.record("filelists").map(|r| r.location_href.as_str()),
            Some("repodata/filelists.xml.gz")
        );
        assert!(repomd.record("other").is_none());
        Ok(())
    }
}
