use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use seekio::{tee, with_close, Close, SeekBuffer, WriteCounter};

mod test_support;
use test_support::{read_str, TestSource, ALPHABET};

#[test]
fn copies_what_is_read() {
    let mut reader = tee(TestSource::alphabet().with_max_read(4), Vec::new());
    assert_eq!(read_str(&mut reader, 10), "abcdefghij");
    assert_eq!(reader.writer(), b"abcdefghij");

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    let (_, copy) = reader.into_inner();
    assert_eq!(copy, ALPHABET);
}

/// Refuses every write after the first `limit` bytes.
struct Full {
    limit: usize,
    taken: usize,
}

impl Write for Full {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit - self.taken);
        if n == 0 && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "full"));
        }
        self.taken += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_fails_the_read() {
    let mut reader = tee(TestSource::alphabet(), Full { limit: 6, taken: 0 });
    assert_eq!(read_str(&mut reader, 4), "abcd");

    let err = reader.read(&mut [0u8; 4]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    assert_eq!(reader.writer().taken, 6);
}

#[test]
fn close_reaches_the_reader() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let source = with_close(&ALPHABET[..], move || {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let mut reader = tee(source, WriteCounter::new(io::sink()));
    assert_eq!(read_str(&mut reader, 3), "abc");
    assert_eq!(reader.writer().bytes_written(), 3);

    reader.close().unwrap();
    reader.close().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cached_bytes_are_teed_once() {
    let reader = tee(TestSource::alphabet(), WriteCounter::new(Vec::new()));
    let mut buffer = SeekBuffer::new(reader, 8);

    buffer.seek(SeekFrom::Start(10)).unwrap();
    buffer.seek(SeekFrom::Start(2)).unwrap();
    assert_eq!(read_str(&mut buffer, 8), "cdefghij");

    let copies = buffer.as_cache().unwrap().get_ref().writer();
    assert_eq!(copies.bytes_written(), 10);
    assert_eq!(copies.get_ref(), b"abcdefghij");
}
