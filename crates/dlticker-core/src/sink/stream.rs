//! Sink over any byte stream (stdout, stderr, a pipe).

use std::io::{self, Write};
use std::sync::Mutex;

use super::Sink;

/// Serializes writes to a stream with a short-held lock.
pub struct StreamSink {
    name: &'static str,
    stream: Mutex<Box<dyn Write + Send>>,
}

impl StreamSink {
    pub fn new(name: &'static str, stream: Box<dyn Write + Send>) -> Self {
        Self {
            name,
            stream: Mutex::new(stream),
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout", Box::new(io::stdout()))
    }

    pub fn stderr() -> Self {
        Self::new("stderr", Box::new(io::stderr()))
    }
}

impl Sink for StreamSink {
    fn write_text(&self, text: &str) {
        let mut stream = self.stream.lock().unwrap_or_else(|e| e.into_inner());
        let result = stream
            .write_all(text.as_bytes())
            .and_then(|()| stream.flush());
        if let Err(e) = result {
            tracing::warn!(sink = self.name, error = %e, "dropped log write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_verbatim_without_newline() {
        let buf = SharedBuf::default();
        let sink = StreamSink::new("test", Box::new(buf.clone()));
        sink.write_text("one");
        sink.write_text("two\n");
        assert_eq!(&*buf.0.lock().unwrap(), b"onetwo\n");
    }

    #[test]
    fn broken_stream_does_not_panic() {
        let sink = StreamSink::new("broken", Box::new(Broken));
        sink.write_text("lost");
        sink.write_text("lost again");
    }

    #[test]
    fn concurrent_writes_do_not_interleave() {
        let buf = SharedBuf::default();
        let sink = Arc::new(StreamSink::new("test", Box::new(buf.clone())));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    let line = format!("{}\n", i.to_string().repeat(64));
                    for _ in 0..50 {
                        sink.write_text(&line);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.lines().count(), 400);
        for line in out.lines() {
            let first = line.chars().next().unwrap();
            assert!(line.chars().all(|c| c == first), "interleaved line: {line}");
        }
    }
}
