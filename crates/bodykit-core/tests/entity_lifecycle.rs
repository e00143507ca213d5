use bodykit_core::{
    ContentType, FileEntity, HttpMessage, MessageHead, NamedEntity, PartContent,
    PartitionedEntity, TempFile,
};
use std::collections::HashSet;
use std::io::{Read, Write};

fn assert_send<T: Send>() {}

fn spooled(filename: &str, content: &[u8]) -> FileEntity {
    let (file, mut handle) = TempFile::create(None).expect("create temp file");
    handle.write_all(content).expect("write temp file");
    drop(handle);
    FileEntity::spooled(filename, file, content.len() as u64)
}

#[test]
fn test_entities_are_send() {
    assert_send::<PartitionedEntity>();
    assert_send::<NamedEntity>();
    assert_send::<FileEntity>();
    assert_send::<TempFile>();
}

#[test]
fn test_temp_files_are_unique_across_threads() {
    let files: Vec<TempFile> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..16)
                        .map(|_| TempFile::create(None).expect("create").0)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("thread"))
            .collect()
    });

    let paths: HashSet<_> = files.iter().map(|file| file.path().to_path_buf()).collect();
    assert_eq!(paths.len(), files.len());

    let kept: Vec<_> = paths.into_iter().collect();
    drop(files);
    assert!(kept.iter().all(|path| !path.exists()));
}

#[test]
fn test_partitioned_close_releases_unread_files() {
    let mut entity = PartitionedEntity::new(vec![
        NamedEntity::text("title", "report"),
        NamedEntity::file("a", spooled("a.txt", b"first")),
        NamedEntity::file("b", spooled("b.txt", b"second")),
        NamedEntity::file("c", FileEntity::in_memory("c.txt", b"third".to_vec())),
    ]);
    let paths: Vec<_> = entity
        .files()
        .filter_map(|(_, file)| file.spooled_path().map(std::path::Path::to_path_buf))
        .collect();
    assert_eq!(paths.len(), 2);

    let mut content = String::new();
    entity
        .file("a")
        .expect("file a")
        .reader()
        .expect("reader")
        .read_to_string(&mut content)
        .expect("read");
    assert_eq!(content, "first");

    entity.close().expect("close");
    assert!(entity.is_closed());
    assert!(paths.iter().all(|path| !path.exists()));
    assert!(entity.files().all(|(_, file)| file.is_closed()));
    assert_eq!(entity.text("title"), Some("report"));
}

#[test]
fn test_into_entities_hands_over_file_ownership() {
    let entity = PartitionedEntity::new(vec![NamedEntity::file("a", spooled("a.txt", b"x"))]);
    let mut parts = entity.into_entities();
    let path = parts[0]
        .as_file()
        .and_then(FileEntity::spooled_path)
        .expect("spooled")
        .to_path_buf();
    assert!(path.exists());

    let (name, content) = parts.remove(0).into_parts();
    assert_eq!(name, "a");
    let PartContent::File(mut file) = content else {
        panic!("expected a file part");
    };
    let mut sink = Vec::new();
    assert_eq!(file.transfer_to(&mut sink).expect("transfer"), 1);
    assert_eq!(sink, b"x");
    file.close().expect("close");
    assert!(!path.exists());
}

#[test]
fn test_message_head_exposes_parsed_content_type() {
    let head = MessageHead::new().with_header(
        "content-type",
        "Multipart/Form-Data; boundary=\"a b\"; charset=latin1",
    );
    let content_type = head.content_type().expect("content type");
    assert!(content_type.is_multipart());
    assert_eq!(content_type.media_type(), "multipart/form-data");
    assert_eq!(content_type.boundary(), Some("a b"));
    assert_eq!(
        content_type.charset().map(encoding_rs::Encoding::name),
        Some("windows-1252")
    );
    assert_eq!(
        head.headers().get("Content-Type").map(ContentType::parse),
        Some(content_type.clone())
    );
}
