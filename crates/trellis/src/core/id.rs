use slotmap::new_key_type;

new_key_type! {
    /// Opaque, stable handle for a view stored in the Core arena.
    ///
    /// Handles stay valid only while the view is live; a destroyed view's
    /// handle never resolves again, even if the slot is reused.
    pub struct ViewId;
}
