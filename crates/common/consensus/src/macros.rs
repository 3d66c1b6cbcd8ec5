/// Return `Err(Error::Invalid($result))` from the enclosing function unless `$condition` holds.
///
/// Expects an `Error` type with an `Invalid` variant to be in scope.
macro_rules! verify {
    ($condition: expr, $result: expr) => {
        if !$condition {
            return Err(Error::Invalid($result));
        }
    };
}

macro_rules! impl_from_beacon_state_error {
    ($type: ident) => {
        impl From<BeaconStateError> for $type {
            fn from(err: BeaconStateError) -> $type {
                $type::BeaconState(err)
            }
        }
    };
}

macro_rules! impl_into_with_index {
    ($error_type: ident, $invalid_type: ident) => {
        impl IntoWithIndex<BlockProcessingError> for $error_type {
            fn into_with_index(self, index: usize) -> BlockProcessingError {
                match self {
                    $error_type::Invalid(err) => {
                        BlockProcessingError::Invalid(BlockInvalid::$invalid_type(index, err))
                    }
                    $error_type::BeaconState(err) => BlockProcessingError::BeaconState(err),
                }
            }
        }
    };
}
