//! Tar fixtures for unit tests

#![allow(clippy::expect_used)]

use ::tar::{Builder, EntryType, Header};

/// Build an in-memory GNU tar archive
///
/// Paths ending in `/` become directory entries. Paths longer than the
/// header name field are written with a GNU long-name record.
pub fn tar_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    for &(path, contents) in entries {
        let mut header = Header::new_gnu();
        if path.ends_with('/') {
            header.set_entry_type(EntryType::Directory);
            header.set_mode(0o755);
        } else {
            header.set_entry_type(EntryType::Regular);
            header.set_mode(0o644);
        }
        header.set_size(contents.len() as u64);
        builder
            .append_data(&mut header, path, contents)
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar archive")
}
