use crate::error::Result;

/// Byte source the acquisition loop polls. Implementations must not block
/// longer than their configured read timeout, otherwise stop requests are
/// observed late. An empty read that returns sooner is padded to the timeout
/// by the loop.
pub trait Transport: Send {
    /// Returns the bytes that arrived since the last call, or `None` if the
    /// read timed out without data.
    fn read_available(&mut self) -> Result<Option<Vec<u8>>>;

    /// Releases the underlying device. Further reads fail.
    fn close(&mut self) -> Result<()>;
}
