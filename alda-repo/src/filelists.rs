//! Parsing of `filelists.xml`.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::Error;
use crate::compress::open_reader;

/// The file list of one package, keyed by its pkgid checksum.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilelistsPackage {
    /// The pkgid checksum matching the package's primary metadata.
    pub pkgid: String,
    /// The files the package owns.
    pub files: Vec<String>,
}

/// Reads a `filelists.xml` file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid filelists
/// XML.
pub fn read_filelists(path: &Path) -> Result<Vec<FilelistsPackage>, Error> {
    let mut reader = Reader::from_reader(open_reader(path)?);
    let mut buf = Vec::new();

    let mut packages = Vec::new();
    let mut current: Option<FilelistsPackage> = None;
    let mut in_file = false;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"package" => {
                    let mut package = FilelistsPackage::default();
                    for attr in element.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"pkgid" {
                            package.pkgid = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                    current = Some(package);
                }
                b"file" => {
                    in_file = true;
                    text.clear();
                }
                _ => {}
            },
            Event::Text(content) => {
                if in_file {
                    text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"file" => {
                    if let Some(package) = current.as_mut() {
                        package.files.push(text.trim().to_string());
                    }
                    in_file = false;
                }
                b"package" => {
                    if let Some(package) = current.take() {
                        packages.push(package);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(packages)
}
