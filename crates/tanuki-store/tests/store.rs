// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, missing_docs)]

use std::fs;

use proptest::prelude::*;
use tanuki_schema::{encode_subject, Kanji, Radical, Subject, SubjectKind, Vocabulary};
use tanuki_store::{
    for_each, open, BlobReader, BlobWriter, DirectoryStore, Store, StoreError, SubjectReader,
    SubjectWriter,
};

fn kanji(id: u32, level: u32, japanese: &str) -> Subject {
    let mut subject = Subject::new(id, level, japanese, SubjectKind::Kanji(Kanji::default()));
    subject.slug = format!("kanji-{id}");
    subject
}

#[test]
fn sparse_ids_in_blob_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blob_path = dir.path().join("data.bin");
    let mut blob = BlobWriter::create(&blob_path).unwrap();
    let mut loose = DirectoryStore::create(dir.path().join("raw")).unwrap();
    for id in [5, 2] {
        let subject = kanji(id, 1, "木");
        blob.write(id, &subject).unwrap();
        loose.write(id, &subject).unwrap();
    }
    blob.close().unwrap();

    for store in [open(&blob_path).unwrap(), open(dir.path().join("raw")).unwrap()] {
        assert!(store.count().unwrap() >= 6);
        for id in [0, 1, 3, 4] {
            assert!(!store.has(id), "{id} should be absent in {store:?}");
            assert!(matches!(store.read(id), Err(StoreError::NotFound { .. })));
        }
        assert!(store.has(2));
        assert!(store.has(5));
        assert_eq!(store.read(5).unwrap(), kanji(5, 1, "木"));
    }
}

#[test]
fn open_dispatches_on_path_type() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(open(dir.path()).unwrap(), Store::Directory(_)));

    let blob_path = dir.path().join("data.bin");
    BlobWriter::create(&blob_path).unwrap().close().unwrap();
    let store = open(&blob_path).unwrap();
    assert!(matches!(store, Store::Blob(_)));
    assert_eq!(store.count().unwrap(), 0);

    assert!(matches!(
        open(dir.path().join("missing")),
        Err(StoreError::Missing { .. })
    ));
}

#[test]
fn open_fails_on_corrupt_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write(&path, [9, 0, 0, 0, 1, 2]).unwrap();
    assert!(matches!(open(&path), Err(StoreError::Truncated { .. })));
}

#[test]
fn for_each_skips_gaps_and_corrupt_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path()).unwrap();
    store.write(1, &kanji(1, 1, "一")).unwrap();
    store.write_bytes(2, &[0xff, 0xfe]).unwrap();
    store.write(4, &kanji(4, 1, "四")).unwrap();

    let mut seen = Vec::new();
    for_each(&store, |id, subject| {
        assert_eq!(id, subject.id);
        seen.push(id);
        Ok::<_, StoreError>(())
    })
    .unwrap();
    assert_eq!(seen, vec![1, 4]);
}

#[test]
fn for_each_stops_on_visitor_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::open(dir.path()).unwrap();
    for id in 0..3 {
        store.write(id, &kanji(id, 1, "三")).unwrap();
    }
    let mut visited = 0;
    let result = for_each(&store, |id, _| {
        visited += 1;
        if id == 1 {
            Err(StoreError::NotFound { id: 99 })
        } else {
            Ok(())
        }
    });
    assert!(matches!(result, Err(StoreError::NotFound { id: 99 })));
    assert_eq!(visited, 2);
}

#[test]
fn blob_round_trip_preserves_every_kind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let mut radical = Subject::new(1, 1, "", SubjectKind::Radical(Radical::default()));
    radical.amalgamation_subject_ids = vec![2];
    let mut vocab = Subject::new(3, 2, "二つ", SubjectKind::Vocabulary(Vocabulary::default()));
    vocab.component_subject_ids = vec![2];
    let subjects = [radical, kanji(2, 1, "二"), vocab];

    let mut writer = BlobWriter::create(&path).unwrap();
    for subject in &subjects {
        writer.write(subject.id, subject).unwrap();
    }
    writer.close().unwrap();

    let reader = BlobReader::open(&path).unwrap();
    for subject in &subjects {
        assert_eq!(&reader.read(subject.id).unwrap(), subject);
    }
    assert_eq!(reader.subjects_at_level(1).unwrap().radicals, vec![1]);
    assert_eq!(reader.subjects_at_level(2).unwrap().vocabulary, vec![3]);
}

proptest! {
    #[test]
    fn offsets_are_prefix_sums_of_payload_lengths(slugs in prop::collection::vec("[a-z]{0,40}", 1..24)) {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = BlobWriter::create(dir.path().join("data.bin")).unwrap();
        let subjects: Vec<Subject> = slugs
            .iter()
            .zip(0u32..)
            .map(|(slug, id)| {
                let mut subject = kanji(id, 1, "字");
                subject.slug.clone_from(slug);
                subject
            })
            .collect();
        for subject in &subjects {
            writer.write(subject.id, subject).unwrap();
        }
        let bytes = writer.to_bytes().unwrap();
        let file_size = bytes.len();
        let header_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let payload_start = 4 + header_len;
        let reader = BlobReader::from_bytes(bytes).unwrap();

        let mut expected_offset = 0usize;
        for (subject, &offset) in subjects.iter().zip(&reader.header().subject_byte_offset) {
            let encoded = encode_subject(subject).unwrap();
            prop_assert_eq!(offset as usize, expected_offset);
            prop_assert_eq!(reader.read_bytes(subject.id).unwrap(), encoded.clone());
            expected_offset += encoded.len();
        }
        prop_assert_eq!(payload_start + expected_offset, file_size);
    }
}
