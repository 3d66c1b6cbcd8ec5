use blst::min_pk::{AggregateSignature as BlstAggregateSignature, Signature as BlstSignature};
use ssz_types::FixedVector;

use crate::{errors::BLSError, signature::BLSSignature};

impl BLSSignature {
    pub fn to_blst_signature(&self) -> Result<BlstSignature, BLSError> {
        BlstSignature::from_bytes(self.to_bytes())
            .map_err(|err| BLSError::BlstError(format!("{err:?}")))
    }

    /// Aggregate ``signatures`` into one signature. Fails on an empty input.
    pub fn aggregate(signatures: &[&BLSSignature]) -> Result<BLSSignature, BLSError> {
        if signatures.is_empty() {
            return Err(BLSError::EmptyAggregate);
        }
        let signatures = signatures
            .iter()
            .map(|signature| signature.to_blst_signature())
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate_signature =
            BlstAggregateSignature::aggregate(&signatures.iter().collect::<Vec<_>>(), true)
                .map_err(|err| BLSError::BlstError(format!("{err:?}")))?;
        Ok(aggregate_signature.to_signature().into())
    }
}

impl From<BlstSignature> for BLSSignature {
    fn from(value: BlstSignature) -> Self {
        BLSSignature {
            inner: FixedVector::from(value.to_bytes().to_vec()),
        }
    }
}
