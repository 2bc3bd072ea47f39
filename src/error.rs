use thiserror::Error;

/// Everything that can go wrong while encoding or decoding an image.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The caller passed inputs that contradict each other, such as a pixel
    /// buffer too short for its own dimensions.
    #[error("qoir: invalid argument")]
    InvalidArgument,

    /// The encoded bytes are malformed or truncated.
    #[error("qoir: invalid data")]
    InvalidData,

    #[error("qoir: out of memory")]
    OutOfMemory,

    /// The pixel buffer layout is valid but not handled, e.g. padded rows
    /// passed to the encoder.
    #[error("qoir: unsupported pixbuf")]
    UnsupportedPixbuf,

    /// The pixel format is valid but not handled here.
    #[error("qoir: unsupported pixfmt")]
    UnsupportedPixfmt,
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages() {
        assert_eq!(Error::InvalidData.to_string(), "qoir: invalid data");
        assert_eq!(Error::UnsupportedPixbuf.to_string(), "qoir: unsupported pixbuf");
    }
}
