use thiserror::Error;

/// Everything that can go wrong while talking to a volume.
///
/// There is no `Ok`/success variant here on purpose: success is `Ok(T)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no file with this handle exists in the table")]
    FileNotFound,

    #[error("the hash table has no free segment left for this probe start")]
    NoSpace,

    #[error("filename is empty or longer than the 23-byte name field")]
    BadFilename,

    #[error("a file with this handle already exists")]
    Exists,

    #[error("block holds a segment of the wrong kind for this read")]
    WrongSegmentType,

    #[error("argument is out of range for this operation")]
    InvalidArgument,

    #[error("a segment expected by the hash chain is missing (a hole)")]
    MissingSegment,

    #[error("block device reported error code {0}")]
    IoError(u8),

    #[error("volume geometry is unusable: bucket_count {bucket_count} exceeds device size {device_size}")]
    CardError { bucket_count: u32, device_size: u32 },
}
