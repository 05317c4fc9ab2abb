/// A reliable, ordered byte stream to one remote host.
///
/// Implementations are driven by an I/O facility that may live on another
/// thread; every method here must return immediately with whatever that
/// facility has already buffered.
pub trait Transport: Send {
    /// Queues bytes for delivery and returns how many were accepted
    fn send(&mut self, bytes: &[u8]) -> usize;

    /// Takes every byte received since the last call
    fn receive_available(&mut self) -> Vec<u8>;

    /// False once the stream has errored or been closed by either side
    fn is_connected(&self) -> bool;

    /// Half-closes the stream. Bytes already queued are still delivered.
    fn shutdown(&mut self);

    fn remote_has_shutdown(&self) -> bool;

    fn bytes_queued_to_send(&self) -> usize;
}
