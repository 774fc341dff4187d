#![cfg(feature = "jar-utils")]

mod common;

use std::io::{Cursor, Write};

use entity_enhance::hierarchy::{ClassBytesProvider, CommonSuperResolver, TypeCache};
use entity_enhance::jar_utils::{ClassPath, ClassPathEntry, JarFile};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use common::*;

/// Build a minimal JAR in-memory with the given entries.
fn build_jar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.add_directory("test/", options).unwrap();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }
    buf.into_inner()
}

fn write_class(root: &std::path::Path, name: &str, bytes: &[u8]) {
    let path = root.join(format!("{name}.class"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn test_jar_file_entries() {
    let a = class_bytes("test/A", "java/lang/Object", &[]);
    let jar = JarFile::from_bytes(&build_jar(&[
        ("test/A.class", &a),
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
    ]))
    .unwrap();

    assert_eq!(jar.class_names().collect::<Vec<_>>(), vec!["test/A.class"]);
    assert_eq!(jar.entry_names().count(), 2);
    assert!(jar.contains_entry("META-INF/MANIFEST.MF"));
    assert!(!jar.contains_entry("test/"));
    assert_eq!(jar.get_entry("test/A.class"), Some(a.as_slice()));
}

#[test]
fn test_jar_file_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.jar");
    std::fs::write(&path, build_jar(&[("test/A.class", b"\xca\xfe")])).unwrap();

    let jar = JarFile::open(&path).unwrap();
    assert!(jar.contains_entry("test/A.class"));
    assert!(JarFile::open(dir.path().join("missing.jar")).is_err());
}

#[test]
fn test_find_in_directory_and_jar() {
    let dir = tempfile::tempdir().unwrap();
    write_class(dir.path(), "test/B", &class_bytes("test/B", "test/A", &[]));
    let jar = build_jar(&[("test/A.class", &class_bytes("test/A", "java/lang/Object", &[]))]);

    let mut class_path = ClassPath::new();
    class_path.add_dir(dir.path());
    class_path.add_jar_bytes(&jar).unwrap();

    assert_eq!(class_path.entries().len(), 2);
    assert!(matches!(class_path.entries()[0], ClassPathEntry::Directory(_)));
    assert!(class_path.find_class("test/B").is_some());
    assert!(class_path.find_class("test/A").is_some());
    assert!(class_path.class_bytes("test/Missing").is_none());
}

#[test]
fn test_earlier_entry_wins() {
    let dir = tempfile::tempdir().unwrap();
    let from_dir = class_bytes("test/X", "test/A", &[]);
    write_class(dir.path(), "test/X", &from_dir);
    let jar = build_jar(&[("test/X.class", &class_bytes("test/X", "test/D", &[]))]);

    let mut class_path = ClassPath::new();
    class_path.add_dir(dir.path()).add_jar_bytes(&jar).unwrap();

    assert_eq!(class_path.find_class("test/X"), Some(from_dir));
}

#[test]
fn test_resolve_over_class_path() {
    let dir = tempfile::tempdir().unwrap();
    write_class(dir.path(), "test/C", &class_bytes("test/C", "test/B", &[]));
    write_class(dir.path(), "test/B", &class_bytes("test/B", "test/A", &[]));

    let jar_path = dir.path().join("base.jar");
    std::fs::write(
        &jar_path,
        build_jar(&[
            ("test/A.class", &class_bytes("test/A", "java/lang/Object", &[])),
            ("test/D.class", &class_bytes("test/D", "test/A", &[])),
        ]),
    )
    .unwrap();

    let mut class_path = ClassPath::new();
    class_path.add_dir(dir.path());
    class_path.add_jar(&jar_path).unwrap();

    let mut cache = TypeCache::new();
    let mut unresolved = Vec::new();
    let mut resolver = CommonSuperResolver::new(&class_path, &mut cache, &mut unresolved);
    assert_eq!(resolver.common_super_class("test/C", "test/D"), "test/A");
    assert!(unresolved.is_empty());
}
