use crate::{
    beacon_state::BeaconState,
    errors::BeaconStateError,
    eth_1_data::{Eth1Data, Eth1DataVote},
};

impl BeaconState {
    /// Count a vote for ``eth1_data``, opening a new tally on the first vote.
    pub fn process_eth1_data(&mut self, eth1_data: &Eth1Data) -> Result<(), BeaconStateError> {
        if let Some(vote) = self
            .eth1_data_votes
            .iter_mut()
            .find(|vote| vote.eth1_data == *eth1_data)
        {
            vote.vote_count += 1;
            return Ok(());
        }

        self.eth1_data_votes.push(Eth1DataVote {
            eth1_data: eth1_data.clone(),
            vote_count: 1,
        })?;
        Ok(())
    }
}
