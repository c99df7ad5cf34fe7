// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority tests for the resource resolver across every mix of present sources.

use std::fs;
use std::path::Path;

use flowci_resource::{
    Resource, ResourceBundle, ResourceConfig, ResourceResolver, ResourceSource, SystemProperties,
};
use serial_test::serial;

const ENV_NAME: &str = "FLOWCI_RESOLVE_TEST_PATH";
const PROPERTY_NAME: &str = "resolve.test.path";

struct Fixture {
    _dir: tempfile::TempDir,
    resolver: ResourceResolver,
}

/// Build a resolver where source `i` exists iff bit `i` of `present` is set.
/// Sources that are absent still point somewhere, just at a missing path.
fn fixture(present: u8) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let exists = |source: ResourceSource| {
        let bit = ResourceSource::ORDER
            .iter()
            .position(|s| *s == source)
            .unwrap();
        present & (1 << bit) != 0
    };

    let file = |name: &str, source: ResourceSource| {
        let path = root.join(name);
        if exists(source) {
            fs::write(&path, source.as_str()).unwrap();
        }
        path.display().to_string()
    };

    let env_path = file("env.cfg", ResourceSource::EnvVar);
    let property_path = file("property.cfg", ResourceSource::SystemProperty);
    let default_dir = file("default-dir.cfg", ResourceSource::DefaultDirectory);

    let bundle_root = root.join("bundle");
    fs::create_dir(&bundle_root).unwrap();
    for (name, source) in [
        ("entry.cfg", ResourceSource::ClasspathEntry),
        ("fallback.cfg", ResourceSource::ClasspathDefault),
    ] {
        if exists(source) {
            fs::write(bundle_root.join(name), source.as_str()).unwrap();
        }
    }

    // SAFETY: tests touching this variable are #[serial].
    unsafe { std::env::set_var(ENV_NAME, &env_path) };

    let properties: SystemProperties = [(PROPERTY_NAME, property_path)].into_iter().collect();
    let resolver = ResourceResolver::new(
        ResourceConfig::default()
            .with_env_name(ENV_NAME)
            .with_property_name(PROPERTY_NAME)
            .with_default_dir(default_dir)
            .with_classpath("entry.cfg")
            .with_default("fallback.cfg"),
    )
    .with_properties(properties)
    .with_bundle(ResourceBundle::new().with_root(&bundle_root));

    Fixture {
        _dir: dir,
        resolver,
    }
}

fn read(resource: &Resource) -> String {
    resource.read_to_string().unwrap()
}

#[test]
#[serial]
fn highest_priority_existing_source_wins() {
    for present in 0u8..32 {
        let Fixture { _dir, resolver } = fixture(present);
        let expected = ResourceSource::ORDER
            .iter()
            .enumerate()
            .find(|(bit, _)| present & (1 << bit) != 0)
            .map(|(_, source)| *source);

        let resolved = resolver.resolve();
        assert_eq!(
            resolved.as_ref().map(Resource::source),
            expected,
            "present sources mask {present:05b}"
        );
        if let Some(resource) = &resolved {
            assert_eq!(read(resource), resource.source().as_str());
        }
    }
    unsafe { std::env::remove_var(ENV_NAME) };
}

#[test]
#[serial]
fn unset_env_falls_back_to_property_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.properties");
    fs::write(&cfg, "key=value\n").unwrap();
    unsafe { std::env::remove_var("CFG_PATH") };

    let properties: SystemProperties = [("cfg.path", cfg.display().to_string())]
        .into_iter()
        .collect();
    let resolver = ResourceResolver::new(
        ResourceConfig::default()
            .with_env_name("CFG_PATH")
            .with_property_name("cfg.path"),
    )
    .with_properties(properties);

    let resource = resolver.resolve().expect("property path exists");
    assert_eq!(resource.source(), ResourceSource::SystemProperty);
    assert_eq!(resource.file_path(), Some(Path::new(&cfg)));
}
