/// ``LeafIndex`` is the index of a leaf in the **bottom** layer of the ``tree``.
pub(crate) type LeafIndex = u64;

/// Return the given bit of a leaf index, counting from the bottom layer upwards.
pub(crate) fn get_index_bit(index: LeafIndex, position: u64) -> bool {
    position < u64::BITS as u64 && (index & (1 << position)) > 0
}

/// Index of the node paired with ``index`` in the same layer.
pub(crate) fn sibling_index(index: usize) -> usize {
    index ^ 1
}
