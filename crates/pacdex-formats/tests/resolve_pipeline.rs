//! End-to-end tests: compressed repository database to resolved file name

#![allow(clippy::expect_used, clippy::unwrap_used)]

use flate2::Compression;
use flate2::write::GzEncoder;
use liblzma::write::XzEncoder;
use pacdex_formats::{
    ArchiveError, ArchiveIndex, Codec, CompressedBlob, DatabaseError, DecompressOptions,
    PackageDescriptor, PackagePattern, RepositoryDatabase, build_index, decompress, read_entry,
    resolve,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Write;
use tar::{Builder, EntryType, Header};

fn descriptor(file_name: &str, name: &str, version: &str) -> String {
    PackageDescriptor::new()
        .insert("FILENAME", [file_name])
        .insert("NAME", [name])
        .insert("VERSION", [version])
        .build()
}

fn append(builder: &mut Builder<Vec<u8>>, path: &str, kind: EntryType, data: &[u8]) {
    let mut header = Header::new_gnu();
    header.set_entry_type(kind);
    header.set_mode(if kind.is_dir() { 0o755 } else { 0o644 });
    header.set_size(data.len() as u64);
    builder.append_data(&mut header, path, data).unwrap();
}

fn repository_tar(packages: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (name, version, file_name) in packages {
        let dir = format!("{name}-{version}/");
        append(&mut builder, &dir, EntryType::Directory, b"");
        append(
            &mut builder,
            &format!("{dir}desc"),
            EntryType::Regular,
            descriptor(file_name, name, version).as_bytes(),
        );
    }
    builder.into_inner().unwrap()
}

fn files_tar<'a>(files: impl IntoIterator<Item = (String, &'a [u8])>) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for (path, data) in files {
        append(&mut builder, &path, EntryType::Regular, data);
    }
    builder.into_inner().unwrap()
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn xz(data: &[u8]) -> Vec<u8> {
    let mut encoder = XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn core_packages() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("bash", "5.2.026-2", "bash-5.2.026-2-x86_64.pkg.tar.zst"),
        ("curl", "8.5.0-1", "curl-8.5.0-1-x86_64.pkg.tar.zst"),
        ("zlib", "1:1.3.1-1", "zlib-1:1.3.1-1-x86_64.pkg.tar.zst"),
    ]
}

#[test]
fn gzip_database_resolves() {
    let blob = CompressedBlob::new(Codec::Gzip, gzip(&repository_tar(&core_packages())));
    let database = RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap();

    let resolved = database.resolve(&"curl".into()).unwrap();
    assert_eq!(resolved.file_name, "curl-8.5.0-1-x86_64.pkg.tar.zst");
    assert_eq!(resolved.entry_name, "curl-8.5.0-1/desc");
}

#[test]
fn xz_database_resolves() {
    let blob = CompressedBlob::new(Codec::Xz, xz(&repository_tar(&core_packages())));
    let database = RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap();

    let resolved = database.resolve(&"zlib".into()).unwrap();
    assert_eq!(resolved.file_name, "zlib-1:1.3.1-1-x86_64.pkg.tar.zst");
}

#[test]
fn free_functions_compose() {
    let blob = CompressedBlob::new(Codec::Xz, xz(&repository_tar(&core_packages())));
    let raw = decompress(&blob).unwrap();
    let index = build_index(&raw).unwrap();

    let payload = read_entry(&raw, &index, "bash-5.2.026-2/desc").unwrap();
    assert_eq!(
        PackageDescriptor::from_bytes(payload).file_name().unwrap(),
        "bash-5.2.026-2-x86_64.pkg.tar.zst"
    );

    let resolved = resolve(&index, &raw, "core", &PackagePattern::literal("bash")).unwrap();
    assert_eq!(resolved.file_name, "bash-5.2.026-2-x86_64.pkg.tar.zst");
}

#[test]
fn mingw64_uses_toolchain_prefix() {
    let tar = repository_tar(&[
        ("curl", "8.5.0-1", "curl-8.5.0-1-x86_64.pkg.tar.zst"),
        (
            "mingw-w64-x86_64-curl",
            "8.5.0-1",
            "mingw-w64-x86_64-curl-8.5.0-1-any.pkg.tar.zst",
        ),
    ]);
    let blob = CompressedBlob::new(Codec::Gzip, gzip(&tar));

    let mingw = RepositoryDatabase::open("mingw64", &blob, &DecompressOptions::default()).unwrap();
    assert_eq!(
        mingw.resolve(&"curl".into()).unwrap().file_name,
        "mingw-w64-x86_64-curl-8.5.0-1-any.pkg.tar.zst"
    );

    let msys = RepositoryDatabase::open("msys", &blob, &DecompressOptions::default()).unwrap();
    assert_eq!(
        msys.resolve(&"curl".into()).unwrap().file_name,
        "curl-8.5.0-1-x86_64.pkg.tar.zst"
    );
}

#[test]
fn not_found_keeps_database_usable() {
    let database = RepositoryDatabase::from_raw("core", repository_tar(&core_packages())).unwrap();
    let names_before: Vec<String> = database.names().map(str::to_string).collect();

    let err = database.resolve(&"git".into()).unwrap_err();
    assert!(err.is_not_found());

    let names_after: Vec<String> = database.names().map(str::to_string).collect();
    assert_eq!(names_before, names_after);
    assert!(database.resolve(&"curl".into()).is_ok());
}

#[test]
fn truncated_tar_is_corrupt() {
    let mut tar = repository_tar(&core_packages());
    // Cut inside the second header record
    tar.truncate(512 + 200);
    let blob = CompressedBlob::new(Codec::Gzip, gzip(&tar));

    let err = RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap_err();
    assert!(err.is_corrupt());
    assert!(matches!(
        err,
        DatabaseError::Archive {
            source: ArchiveError::Malformed { offset: 512, .. },
            ..
        }
    ));
}

#[test]
fn truncated_compressed_stream_is_corrupt() {
    let mut compressed = xz(&repository_tar(&core_packages()));
    compressed.truncate(compressed.len() / 2);
    let blob = CompressedBlob::new(Codec::Xz, compressed);

    let err = RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap_err();
    assert!(matches!(err, DatabaseError::Decompress { .. }));
    assert!(err.is_corrupt());
}

#[test]
fn indexing_is_idempotent() {
    let tar = repository_tar(&core_packages());
    let first = ArchiveIndex::build(&tar).unwrap();
    let second = ArchiveIndex::build(&tar).unwrap();
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn read_entry_returns_written_payloads(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..2048), 1..12)
    ) {
        let tar = files_tar(
            payloads
                .iter()
                .enumerate()
                .map(|(i, payload)| (format!("entry-{i}/desc"), payload.as_slice())),
        );
        let index = ArchiveIndex::build(&tar).unwrap();

        prop_assert_eq!(index.len(), payloads.len());
        for (i, payload) in payloads.iter().enumerate() {
            let name = format!("entry-{i}/desc");
            prop_assert_eq!(index.read_entry(&tar, &name).unwrap(), payload.as_slice());
        }
    }

    #[test]
    fn gzip_round_trip_preserves_index(
        sizes in prop::collection::vec(0usize..1500, 1..6)
    ) {
        let payloads: Vec<Vec<u8>> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| vec![b'a' + (i % 26) as u8; *size])
            .collect();
        let tar = files_tar(
            payloads
                .iter()
                .enumerate()
                .map(|(i, payload)| (format!("p{i}"), payload.as_slice())),
        );
        let blob = CompressedBlob::new(Codec::Gzip, gzip(&tar));

        let database = RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap();
        prop_assert_eq!(database.raw(), tar.as_slice());
        prop_assert_eq!(database.index(), &ArchiveIndex::build(&tar).unwrap());
    }
}
