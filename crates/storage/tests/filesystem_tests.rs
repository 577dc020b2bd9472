//! Filesystem blob sink behavior tests.

use bytes::Bytes;
use hoist_storage::{BlobSink, ByteStream, FilesystemBackend, StorageError};
use tempfile::tempdir;

fn stream_of(chunks: Vec<std::io::Result<Bytes>>) -> ByteStream {
    Box::pin(futures::stream::iter(chunks))
}

fn ok_chunks(chunks: &[&[u8]]) -> ByteStream {
    stream_of(chunks.iter().map(|c| Ok(Bytes::copy_from_slice(c))).collect())
}

#[tokio::test]
async fn append_at_zero_creates_the_blob() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    let written = sink.append("blob-a", 0, ok_chunks(&[b"hello", b" world"])).await.unwrap();
    assert_eq!(written, 11);
    assert_eq!(sink.length("blob-a").await.unwrap(), 11);

    let on_disk = std::fs::read(temp.path().join("blob-a")).unwrap();
    assert_eq!(on_disk, b"hello world");
}

#[tokio::test]
async fn append_at_length_extends() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    sink.append("blob-a", 0, ok_chunks(&[b"abc"])).await.unwrap();
    let written = sink.append("blob-a", 3, ok_chunks(&[b"def"])).await.unwrap();
    assert_eq!(written, 3);
    assert_eq!(sink.length("blob-a").await.unwrap(), 6);

    let on_disk = std::fs::read(temp.path().join("blob-a")).unwrap();
    assert_eq!(on_disk, b"abcdef");
}

#[tokio::test]
async fn append_below_length_truncates_first() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    sink.append("blob-a", 0, ok_chunks(&[b"abcdef"])).await.unwrap();
    sink.append("blob-a", 3, ok_chunks(&[b"XY"])).await.unwrap();
    assert_eq!(sink.length("blob-a").await.unwrap(), 5);

    let on_disk = std::fs::read(temp.path().join("blob-a")).unwrap();
    assert_eq!(on_disk, b"abcXY");
}

#[tokio::test]
async fn append_beyond_length_is_rejected() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    let err = sink.append("blob-a", 4, ok_chunks(&[b"x"])).await.unwrap_err();
    assert_eq!(err.written, 0);
    assert!(matches!(
        err.source,
        StorageError::InvalidOffset { offset: 4, length: 0 }
    ));
}

#[tokio::test]
async fn stream_error_reports_exact_written_count() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    let body = stream_of(vec![
        Ok(Bytes::from_static(b"abc")),
        Ok(Bytes::from_static(b"de")),
        Err(std::io::Error::other("client went away")),
        Ok(Bytes::from_static(b"never")),
    ]);
    let err = sink.append("blob-a", 0, body).await.unwrap_err();
    assert_eq!(err.written, 5);
    assert_eq!(sink.length("blob-a").await.unwrap(), 5);
}

#[tokio::test]
async fn timeout_errors_are_classified() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    let body = stream_of(vec![
        Ok(Bytes::from_static(b"ab")),
        Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "read deadline")),
    ]);
    let err = sink.append("blob-a", 0, body).await.unwrap_err();
    assert_eq!(err.written, 2);
    assert!(err.source.is_timeout());
}

#[tokio::test]
async fn empty_body_is_a_noop_append() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    let written = sink.append("blob-a", 0, ok_chunks(&[])).await.unwrap();
    assert_eq!(written, 0);
    assert_eq!(sink.length("blob-a").await.unwrap(), 0);
}

#[tokio::test]
async fn truncate_rolls_back_to_snapshot() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    sink.append("blob-a", 0, ok_chunks(&[b"abcdef"])).await.unwrap();
    sink.truncate("blob-a", 2).await.unwrap();
    assert_eq!(sink.length("blob-a").await.unwrap(), 2);

    // Truncating to the current length or above changes nothing.
    sink.truncate("blob-a", 2).await.unwrap();
    sink.truncate("blob-a", 10).await.unwrap();
    assert_eq!(sink.length("blob-a").await.unwrap(), 2);
}

#[tokio::test]
async fn truncate_missing_blob_to_zero_is_ok() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    sink.truncate("missing", 0).await.unwrap();
    assert!(matches!(
        sink.truncate("missing", 3).await.unwrap_err(),
        StorageError::NotFound(_)
    ));
}

#[tokio::test]
async fn length_of_missing_blob_is_zero() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();
    assert_eq!(sink.length("missing").await.unwrap(), 0);
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let temp = tempdir().unwrap();
    let sink = FilesystemBackend::new(temp.path()).await.unwrap();

    for key in ["../escape", "/etc/passwd", "a/../b", ""] {
        assert!(matches!(
            sink.length(key).await.unwrap_err(),
            StorageError::InvalidKey(_)
        ));
    }
}
