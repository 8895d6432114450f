//! Parsing of `primary.xml`.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use alda_types::{Arch, Evr, EvrComparison, Name, Nevra, PackageObject, Relation};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::Error;
use crate::compress::open_reader;
use crate::filelists::FilelistsPackage;

/// The parsed contents of a repository's `primary.xml`.
///
/// Keeps a pkgid index so that `filelists.xml` contents can be merged into
/// the per-package file lists afterwards.
#[derive(Clone, Debug, Default)]
pub struct Primary {
    /// The packages, in document order.
    pub packages: Vec<PackageObject>,
    pkgids: HashMap<String, usize>,
}

impl Primary {
    /// Merges parsed `filelists.xml` entries into the package file lists.
    ///
    /// Entries whose pkgid is unknown are ignored; the file lists of matched
    /// packages are replaced by the union of both sources.
    pub fn merge_filelists(&mut self, filelists: Vec<FilelistsPackage>) {
        for entry in filelists {
            if let Some(&index) = self.pkgids.get(&entry.pkgid) {
                let package = &mut self.packages[index];
                let mut files: Vec<String> = std::mem::take(&mut package.files);
                for file in entry.files {
                    if !files.contains(&file) {
                        files.push(file);
                    }
                }
                package.files = files;
            }
        }
    }

    /// Consumes the metadata and returns the packages.
    pub fn into_packages(self) -> Vec<PackageObject> {
        self.packages
    }
}

/// The leaf element whose text content is currently being collected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TextField {
    Name,
    Arch,
    Checksum,
    Sourcerpm,
    File,
}

/// The dependency list currently being read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum DepKind {
    #[default]
    None,
    Requires,
    Provides,
    Other,
}

#[derive(Debug, Default)]
struct PackageBuilder {
    name: String,
    arch: String,
    evr: Option<Evr>,
    checksum: String,
    location: String,
    sourcerpm: String,
    requires: Vec<Relation>,
    provides: Vec<Relation>,
    files: Vec<String>,
}

impl PackageBuilder {
    fn finish(self, reponame: &str, path: &Path) -> Result<(PackageObject, String), Error> {
        let evr = self.evr.ok_or_else(|| Error::MalformedMetadata {
            path: path.to_path_buf(),
            reason: format!("package '{}' has no version element", self.name),
        })?;
        let nevra = Nevra::new(Name::new(&self.name)?, evr, Arch::new(&self.arch)?);
        let mut package = PackageObject::new(nevra, reponame);
        package.location = self.location;
        package.sourcerpm = self.sourcerpm;
        package.requires = self.requires;
        package.provides = self.provides;
        package.files = self.files;
        Ok((package, self.checksum))
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

fn parse_evr_attributes(element: &BytesStart, path: &Path) -> Result<Option<Evr>, Error> {
    let Some(version) = attribute(element, b"ver", path)? else {
        return Ok(None);
    };
    let epoch = match attribute(element, b"epoch", path)? {
        Some(epoch) => Some(epoch.parse().map_err(|_| Error::MalformedMetadata {
            path: path.to_path_buf(),
            reason: format!("invalid epoch '{epoch}'"),
        })?),
        None => None,
    };
    let release = attribute(element, b"rel", path)?;
    Ok(Some(Evr::new(epoch, &version, release.as_deref())))
}

fn parse_entry(element: &BytesStart, path: &Path) -> Result<Option<Relation>, Error> {
    let Some(name) = attribute(element, b"name", path)? else {
        return Err(Error::MalformedMetadata {
            path: path.to_path_buf(),
            reason: "dependency entry has no name".to_string(),
        });
    };
    // Entries like rpmlib(CompressedFileNames) are satisfied by rpm itself,
    // never by a package.
    if name.starts_with("rpmlib(") {
        return Ok(None);
    }
    let mut relation = Relation::new(&name);
    if let Some(flags) = attribute(element, b"flags", path)? {
        if let Some(evr) = parse_evr_attributes(element, path)? {
            relation.requirement = Some(alda_types::EvrRequirement::new(
                EvrComparison::from_str(&flags)?,
                evr,
            ));
        }
    }
    Ok(Some(relation))
}

/// Reads a `primary.xml` file into package objects tagged with `reponame`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not valid primary XML,
/// or contains a package record with invalid identity fields.
pub fn read_primary(path: &Path, reponame: &str) -> Result<Primary, Error> {
    let mut reader = Reader::from_reader(open_reader(path)?);
    let mut buf = Vec::new();

    let mut primary = Primary::default();
    let mut current: Option<PackageBuilder> = None;
    let mut text_field: Option<TextField> = None;
    let mut text = String::new();
    let mut deplist = DepKind::None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref element) => match element.local_name().as_ref() {
                b"package" => {
                    current = Some(PackageBuilder::default());
                    deplist = DepKind::None;
                }
                // Attribute-carrying elements are usually self-closing, but
                // not necessarily.
                b"version" => {
                    if let Some(builder) = current.as_mut() {
                        if builder.evr.is_none() {
                            builder.evr = parse_evr_attributes(element, path)?;
                        }
                    }
                }
                b"location" => {
                    if let Some(builder) = current.as_mut() {
                        if let Some(href) = attribute(element, b"href", path)? {
                            builder.location = href;
                        }
                    }
                }
                b"name" if current.is_some() => text_field = Some(TextField::Name),
                b"arch" if current.is_some() => text_field = Some(TextField::Arch),
                b"checksum" if current.is_some() => text_field = Some(TextField::Checksum),
                b"sourcerpm" if current.is_some() => text_field = Some(TextField::Sourcerpm),
                b"file" if current.is_some() => text_field = Some(TextField::File),
                b"requires" => deplist = DepKind::Requires,
                b"provides" => deplist = DepKind::Provides,
                b"conflicts" | b"obsoletes" | b"recommends" | b"suggests" | b"supplements"
                | b"enhances" => deplist = DepKind::Other,
                _ => {}
            },
            Event::Empty(ref element) => match element.local_name().as_ref() {
                b"version" => {
                    if let Some(builder) = current.as_mut() {
                        if builder.evr.is_none() {
                            builder.evr = parse_evr_attributes(element, path)?;
                        }
                    }
                }
                b"location" => {
                    if let Some(builder) = current.as_mut() {
                        if let Some(href) = attribute(element, b"href", path)? {
                            builder.location = href;
                        }
                    }
                }
                b"entry" => {
                    if let Some(builder) = current.as_mut() {
                        let relation = parse_entry(element, path)?;
                        if let Some(relation) = relation {
                            match deplist {
                                DepKind::Requires => builder.requires.push(relation),
                                DepKind::Provides => builder.provides.push(relation),
                                DepKind::None | DepKind::Other => {}
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::Text(ref content) => {
                if text_field.is_some() {
                    text.push_str(&String::from_utf8_lossy(content));
                }
            }
            Event::End(ref element) => {
                if let (Some(field), Some(builder)) = (text_field, current.as_mut()) {
                    let value = text.trim().to_string();
                    match field {
                        TextField::Name => builder.name = value,
                        TextField::Arch => builder.arch = value,
                        TextField::Checksum => builder.checksum = value,
                        TextField::Sourcerpm => builder.sourcerpm = value,
                        TextField::File => builder.files.push(value),
                    }
                    text_field = None;
                    text.clear();
                }
                match element.local_name().as_ref() {
                    b"package" => {
                        if let Some(builder) = current.take() {
                            let (package, pkgid) = builder.finish(reponame, path)?;
                            if !pkgid.is_empty() {
                                primary.pkgids.insert(pkgid, primary.packages.len());
                            }
                            primary.packages.push(package);
                        }
                    }
                    b"requires" | b"provides" | b"conflicts" | b"obsoletes" | b"recommends"
                    | b"suggests" | b"supplements" | b"enhances" => deplist = DepKind::None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(primary)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    use super::*;

    const PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="2">
<package type="rpm">
  <name>dummy-bash</name>
  <arch>x86_64</arch>
  <version epoch="0" ver="4.2.24" rel="2"/>
  <checksum type="sha256" pkgid="YES">aaaa</checksum>
  <location href="dummy-bash-4.2.24-2.x86_64.rpm"/>
  <format>
    <rpm:sourcerpm>dummy-bash-4.2.24-2.src.rpm</rpm:sourcerpm>
    <rpm:provides>
      <rpm:entry name="dummy-bash" flags="EQ" epoch="0" ver="4.2.24" rel="2"/>
    </rpm:provides>
    <rpm:requires>
      <rpm:entry name="dummy-filesystem" flags="GE" epoch="0" ver="3"/>
      <rpm:entry name="rpmlib(PayloadFilesHavePrefix)" flags="LE" epoch="0" ver="4.0"/>
    </rpm:requires>
    <file>/usr/bin/bash</file>
  </format>
</package>
<package type="rpm">
  <name>dummy-bash</name>
  <arch>src</arch>
  <version epoch="0" ver="4.2.24" rel="2"/>
  <checksum type="sha256" pkgid="YES">bbbb</checksum>
  <location href="dummy-bash-4.2.24-2.src.rpm"/>
  <format>
    <rpm:sourcerpm/>
  </format>
</package>
</metadata>
"#;

    #[test]
    fn parses_packages() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("primary.xml");
        std::fs::write(&path, PRIMARY)?;

        let primary = read_primary(&path, "test-repo")?;
        assert_eq!(primary.packages.len(), 2);

        let bash = &primary.packages[0];
        assert_eq!(bash.to_string(), "dummy-bash-4.2.24-2.x86_64");
        assert_eq!(bash.reponame, "test-repo");
        assert_eq!(bash.location, "dummy-bash-4.2.24-2.x86_64.rpm");
        assert_eq!(bash.sourcerpm, "dummy-bash-4.2.24-2.src.rpm");
        assert_eq!(bash.provides.len(), 1);
        assert_eq!(bash.files, vec!["/usr/bin/bash"]);
        // The rpmlib() pseudo-dependency is dropped.
        assert_eq!(bash.requires.len(), 1);
        assert_eq!(bash.requires[0].to_string(), "dummy-filesystem >= 3");

        let srpm = &primary.packages[1];
        assert_eq!(srpm.to_string(), "dummy-bash-4.2.24-2.src");
        assert!(srpm.is_source());
        assert!(srpm.sourcerpm.is_empty());
        Ok(())
    }

    #[test]
    fn merges_filelists() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("primary.xml");
        std::fs::write(&path, PRIMARY)?;

        let mut primary = read_primary(&path, "test-repo")?;
        primary.merge_filelists(vec![FilelistsPackage {
            pkgid: "aaaa".to_string(),
            files: vec!["/usr/bin/bash".to_string(), "/etc/skel/.bashrc".to_string()],
        }]);

        assert_eq!(
            primary.packages[0].files,
            vec!["/usr/bin/bash", "/etc/skel/.bashrc"]
        );
        Ok(())
    }
}
