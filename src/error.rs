//! Error types for the PDF generator.

/// Result type alias for PDF generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while writing to the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content stream compression failed.
    ///
    /// A stream that requested compression cannot be emitted uncompressed
    /// under a `/FlateDecode` filter name, so this aborts the write pass.
    #[error("Stream compression failed: {0}")]
    Compression(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io.into();
        let msg = format!("{}", err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("pipe closed"));
    }

    #[test]
    fn test_compression_error_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "deflate state corrupt");
        let msg = format!("{}", Error::Compression(io));
        assert!(msg.contains("compression failed"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
