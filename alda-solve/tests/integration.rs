//! Integration tests for `alda-solve`.

use std::str::FromStr;
use std::sync::Arc;

use alda_solve::{Goal, InstallTarget, Request, Sack, Selector};
use alda_types::{Arch, Evr, Name, Nevra, PackageObject, PackageRef, Relation};
use pretty_assertions::assert_eq;

fn create_test_package(
    name: &str,
    evr: &str,
    arch: &str,
    requires: Vec<&str>,
    provides: Vec<&str>,
    files: Vec<&str>,
) -> PackageObject {
    let mut package = PackageObject::new(
        Nevra::new(
            Name::from_str(name).unwrap(),
            Evr::from_str(evr).unwrap(),
            Arch::from_str(arch).unwrap(),
        ),
        "test-repo",
    );
    package.location = format!("{name}-{evr}.{arch}.rpm");
    package.requires = requires
        .into_iter()
        .map(|relation| Relation::from_str(relation).unwrap())
        .collect();
    package.provides = provides
        .into_iter()
        .map(|relation| Relation::from_str(relation).unwrap())
        .collect();
    package.files = files.into_iter().map(ToString::to_string).collect();
    package
}

fn sack_of(packages: Vec<PackageObject>) -> Arc<Sack> {
    let mut sack = Sack::new();
    for package in packages {
        sack.add_package(package);
    }
    Arc::new(sack)
}

fn installs_as_strings(sack: &Sack, goal: &Goal) -> Vec<String> {
    let mut installs: Vec<String> = goal
        .list_installs()
        .iter()
        .map(|&id| sack.package(id).to_string())
        .collect();
    installs.sort();
    installs
}

fn selector_for(name: &str) -> Selector {
    Selector::from_ref(&PackageRef::from_str(name).unwrap())
}

#[test]
fn resolves_transitive_name_dependencies() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["b"], vec![], vec![]),
        create_test_package("b", "1-1", "x86_64", vec!["c >= 2"], vec![], vec![]),
        create_test_package("c", "2-1", "noarch", vec![], vec![], vec![]),
        create_test_package("unrelated", "1-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "b-1-1.x86_64", "c-2-1.noarch"]
    );
}

#[test]
fn resolves_capability_dependencies() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["webserver"], vec![], vec![]),
        create_test_package(
            "nginx",
            "2-1",
            "x86_64",
            vec![],
            vec!["webserver = 2"],
            vec![],
        ),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "nginx-2-1.x86_64"]
    );
}

#[test]
fn resolves_file_dependencies() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["/usr/bin/interp"], vec![], vec![]),
        create_test_package(
            "interp",
            "3-1",
            "x86_64",
            vec![],
            vec![],
            vec!["/usr/bin/interp"],
        ),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "interp-3-1.x86_64"]
    );
}

#[test]
fn prefers_the_highest_version() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["b"], vec![], vec![]),
        create_test_package("b", "1-1", "x86_64", vec![], vec![], vec![]),
        create_test_package("b", "2-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "b-2-1.x86_64"]
    );
}

#[test]
fn versioned_requirement_rules_out_newer_candidates() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["b < 2"], vec![], vec![]),
        create_test_package("b", "1-1", "x86_64", vec![], vec![], vec![]),
        create_test_package("b", "2-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "b-1-1.x86_64"]
    );
}

#[test]
fn source_rpms_never_satisfy_dependencies() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec!["b"], vec![], vec![]),
        create_test_package("b", "3-1", "src", vec![], vec![], vec![]),
        create_test_package("b", "1-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(goal.run());
    // The higher-versioned source RPM is not a candidate.
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["a-1-1.x86_64", "b-1-1.x86_64"]
    );
}

#[test]
fn explicit_source_rpm_resolves_build_dependencies() {
    let sack = sack_of(vec![
        create_test_package("tool", "1-1", "x86_64", vec![], vec![], vec![]),
        create_test_package("lib", "1-1", "src", vec!["tool"], vec![], vec![]),
        create_test_package("lib", "1-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let srpm = sack
        .query()
        .name(&Name::from_str("lib").unwrap())
        .arch(&Arch::from_str("src").unwrap())
        .run();
    assert_eq!(srpm.len(), 1);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Package(srpm[0]));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["lib-1-1.src", "tool-1-1.x86_64"]
    );
}

#[test]
fn unsolvable_goal_reports_problems() {
    let sack = sack_of(vec![create_test_package(
        "a",
        "1-1",
        "x86_64",
        vec!["missing"],
        vec![],
        vec![],
    )]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("a")));
    assert!(!goal.run());
    assert!(!goal.problems().is_empty());
    assert!(goal.list_installs().is_empty());
    assert_eq!(goal.install_requests_as_strings(), vec!["a"]);
}

#[test]
fn install_requests_expand_queries_and_keep_selector_tags() {
    let sack = sack_of(vec![
        create_test_package("a", "1-1", "x86_64", vec![], vec![], vec![]),
        create_test_package("b", "1-1", "x86_64", vec![], vec![], vec![]),
    ]);

    let query = sack.query().run();
    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Query(query));
    goal.install(InstallTarget::Selector(Selector::from_ref(
        &PackageRef::from_str("b.x86_64").unwrap(),
    )));

    assert_eq!(goal.install_requests().len(), 3);
    assert_eq!(
        goal.install_requests_as_strings(),
        vec!["a-1-1.x86_64", "b-1-1.x86_64", "b.x86_64"]
    );
    assert!(goal.run());
}

#[test]
fn run_all_enumerates_provider_alternatives() {
    let sack = sack_of(vec![
        create_test_package(
            "nginx",
            "2-1",
            "x86_64",
            vec![],
            vec!["webserver = 2"],
            vec![],
        ),
        create_test_package(
            "apache",
            "1-1",
            "x86_64",
            vec![],
            vec!["webserver = 1"],
            vec![],
        ),
    ]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(Selector {
        name: Name::from_str("webserver").unwrap(),
        arch: None,
        request: Request::Name("webserver".to_string()),
    }));

    let solutions = goal.run_all();
    assert_eq!(solutions.len(), 2);
    assert!(goal.problems().is_empty());

    let mut providers: Vec<String> = solutions
        .iter()
        .map(|installs| {
            assert_eq!(installs.len(), 1);
            installs
                .iter()
                .map(|&id| sack.package(id).name().to_string())
                .collect()
        })
        .collect();
    providers.sort();
    assert_eq!(providers, vec!["apache", "nginx"]);
}

#[test]
fn run_all_with_unsolvable_selector_reports_problems() {
    let sack = sack_of(vec![create_test_package(
        "a", "1-1", "x86_64", vec![], vec![], vec![],
    )]);

    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("missing")));
    assert!(goal.run_all().is_empty());
    assert!(!goal.problems().is_empty());
}

#[test]
fn query_filters_compose() {
    let mut bash = create_test_package("dummy-bash", "4.2.24-2", "x86_64", vec![], vec![], vec![]);
    bash.sourcerpm = "dummy-bash-4.2.24-2.src.rpm".to_string();
    let mut debuginfo = create_test_package(
        "dummy-bash-debuginfo",
        "4.2.24-2",
        "x86_64",
        vec![],
        vec![],
        vec![],
    );
    debuginfo.sourcerpm = "dummy-bash-4.2.24-2.src.rpm".to_string();
    let srpm = create_test_package("dummy-bash", "4.2.24-2", "src", vec![], vec![], vec![]);
    let sack = sack_of(vec![bash, debuginfo, srpm]);

    assert_eq!(
        sack.query()
            .name(&Name::from_str("dummy-bash").unwrap())
            .count(),
        2
    );
    assert_eq!(
        sack.query()
            .name(&Name::from_str("dummy-bash").unwrap())
            .arch(&Arch::from_str("src").unwrap())
            .count(),
        1
    );
    assert_eq!(
        sack.query().sourcerpm("dummy-bash-4.2.24-2.src.rpm").count(),
        2
    );
    assert_eq!(
        sack.query()
            .sourcerpm("dummy-bash-4.2.24-2.src.rpm")
            .name_substr("-debuginfo")
            .count(),
        1
    );
    assert_eq!(sack.query().name_substr("nope").count(), 0);
}

#[test]
fn load_repo_populates_the_sack_from_metadata_files() -> testresult::TestResult {
    const PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="2">
<package type="rpm">
  <name>dummy-tool</name>
  <arch>x86_64</arch>
  <version epoch="0" ver="1.0" rel="1"/>
  <checksum type="sha256" pkgid="YES">aaaa</checksum>
  <location href="dummy-tool-1.0-1.x86_64.rpm"/>
  <format>
    <rpm:sourcerpm>dummy-tool-1.0-1.src.rpm</rpm:sourcerpm>
    <rpm:requires>
      <rpm:entry name="/usr/bin/dep"/>
    </rpm:requires>
  </format>
</package>
<package type="rpm">
  <name>dummy-dep</name>
  <arch>aarch64</arch>
  <version epoch="0" ver="1.0" rel="1"/>
  <checksum type="sha256" pkgid="YES">bbbb</checksum>
  <location href="dummy-dep-1.0-1.aarch64.rpm"/>
  <format>
    <rpm:sourcerpm>dummy-dep-1.0-1.src.rpm</rpm:sourcerpm>
  </format>
</package>
</metadata>
"#;
    const FILELISTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<filelists xmlns="http://linux.duke.edu/metadata/filelists" packages="2">
<package pkgid="aaaa" name="dummy-tool" arch="x86_64">
  <version epoch="0" ver="1.0" rel="1"/>
  <file>/usr/bin/dummy-tool</file>
</package>
<package pkgid="bbbb" name="dummy-dep" arch="aarch64">
  <version epoch="0" ver="1.0" rel="1"/>
  <file>/usr/bin/dep</file>
</package>
</filelists>
"#;

    let dir = tempfile::tempdir()?;
    let primary = dir.path().join("primary.xml");
    let filelists = dir.path().join("filelists.xml");
    std::fs::write(&primary, PRIMARY)?;
    std::fs::write(&filelists, FILELISTS)?;

    let repo = alda_solve::Repo {
        name: "test-repo".to_string(),
        repomd_fn: dir.path().join("repomd.xml"),
        primary_fn: primary,
        filelists_fn: filelists,
    };

    // The architecture filter drops the aarch64 package.
    let mut sack = Sack::with_arch(&Arch::from_str("x86_64")?);
    assert_eq!(sack.load_repo(&repo, true)?, 1);
    let tool = sack.query().run();
    assert_eq!(tool.len(), 1);
    assert_eq!(sack.package(tool[0]).reponame, "test-repo");
    assert_eq!(sack.package(tool[0]).files, vec!["/usr/bin/dummy-tool"]);

    // Without the filter both packages load and the file dependency
    // resolves through the filelists.
    let mut sack = Sack::new();
    assert_eq!(sack.load_repo(&repo, true)?, 2);
    let sack = Arc::new(sack);
    let mut goal = Goal::new(sack.clone());
    goal.install(InstallTarget::Selector(selector_for("dummy-tool")));
    assert!(goal.run());
    assert_eq!(
        installs_as_strings(&sack, &goal),
        vec!["dummy-dep-1.0-1.aarch64", "dummy-tool-1.0-1.x86_64"]
    );
    Ok(())
}
