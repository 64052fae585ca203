#![no_std]

multiversx_sc::imports!();

pub mod types;

pub mod escrow_proxy;

use types::Proposal;

// ============================================================
// Error codes
// ============================================================

pub const ERR_EMPTY_PARTIES: &str = "ERR_EMPTY_PARTIES";
pub const ERR_LENGTH_MISMATCH: &str = "ERR_LENGTH_MISMATCH";
pub const ERR_ZERO_ADDRESS: &str = "ERR_ZERO_ADDRESS";
pub const ERR_DUPLICATE_PARTY: &str = "ERR_DUPLICATE_PARTY";
pub const ERR_SUM_MISMATCH: &str = "ERR_SUM_MISMATCH";
pub const ERR_PROPOSAL_NOT_FOUND: &str = "ERR_PROPOSAL_NOT_FOUND";
pub const ERR_NOT_A_PAYER: &str = "ERR_NOT_A_PAYER";
pub const ERR_NOT_A_RECEIVER: &str = "ERR_NOT_A_RECEIVER";
pub const ERR_UNAUTHORIZED: &str = "ERR_UNAUTHORIZED";
pub const ERR_ALREADY_COMPLETED: &str = "ERR_ALREADY_COMPLETED";
pub const ERR_NOT_COMPLETED: &str = "ERR_NOT_COMPLETED";
pub const ERR_ALREADY_PAID: &str = "ERR_ALREADY_PAID";
pub const ERR_NOT_YET_PAID: &str = "ERR_NOT_YET_PAID";
pub const ERR_AMOUNT_MISMATCH: &str = "ERR_AMOUNT_MISMATCH";
pub const ERR_ALREADY_WITHDRAWN: &str = "ERR_ALREADY_WITHDRAWN";
pub const ERR_NOT_FULLY_PAID: &str = "ERR_NOT_FULLY_PAID";
pub const ERR_NOTHING_TO_CLAIM: &str = "ERR_NOTHING_TO_CLAIM";

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait EscrowPool {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(&self) {
        let caller = self.blockchain().get_caller();
        self.tip_owner().set(caller);
        self.proposal_count().set(0u64);
        self.tip_balance().set(BigUint::zero());
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: createProposal
    // Validates the full configuration, then assigns the next
    // id. The counter advances only on success.
    // ========================================================

    #[endpoint(createProposal)]
    fn create_proposal(
        &self,
        payers: ManagedVec<ManagedAddress>,
        payer_amounts: ManagedVec<BigUint>,
        receivers: ManagedVec<ManagedAddress>,
        receiver_amounts: ManagedVec<BigUint>,
    ) -> u64 {
        require!(!payers.is_empty(), ERR_EMPTY_PARTIES);
        require!(!receivers.is_empty(), ERR_EMPTY_PARTIES);
        require!(payers.len() == payer_amounts.len(), ERR_LENGTH_MISMATCH);
        require!(
            receivers.len() == receiver_amounts.len(),
            ERR_LENGTH_MISMATCH
        );
        self.require_no_zero_address(&payers);
        self.require_no_zero_address(&receivers);
        self.require_no_duplicates(&payers);
        self.require_no_duplicates(&receivers);

        // Value is conserved end to end: owed in == owed out.
        let total_in = self.sum_amounts(&payer_amounts);
        let total_out = self.sum_amounts(&receiver_amounts);
        require!(total_in == total_out, ERR_SUM_MISMATCH);

        let proposal_id = self.proposal_count().get();
        let caller = self.blockchain().get_caller();
        let timestamp = self.blockchain().get_block_timestamp();

        let proposal = Proposal {
            id: proposal_id,
            payers,
            payer_amounts,
            receivers,
            receiver_amounts,
            completed: false,
            created_at: timestamp,
        };

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id + 1);

        self.proposal_created_event(proposal_id, &caller, &total_in, timestamp);

        proposal_id
    }

    // ========================================================
    // ENDPOINT: deposit
    // A listed payer sends their exact owed amount into custody.
    // Over- and underpayment are both rejected.
    // ========================================================

    #[endpoint(deposit)]
    #[payable("EGLD")]
    fn deposit(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();
        let payment = self.call_value().egld_value().clone_value();

        let proposal = self.require_proposal(proposal_id);
        require!(!proposal.completed, ERR_ALREADY_COMPLETED);

        let owed = match self.payer_amount(&proposal, &caller) {
            Some(amount) => amount,
            None => sc_panic!(ERR_NOT_A_PAYER),
        };
        require!(!self.paid(proposal_id, &caller).get(), ERR_ALREADY_PAID);
        require!(payment == owed, ERR_AMOUNT_MISMATCH);

        self.paid(proposal_id, &caller).set(true);

        self.deposit_event(proposal_id, &caller, &payment);
    }

    // ========================================================
    // ENDPOINT: reclaim
    // A paid payer takes their deposit back. Allowed any number
    // of times before completion, never after.
    // ========================================================

    #[endpoint(reclaim)]
    fn reclaim(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();

        let proposal = self.require_proposal(proposal_id);
        require!(!proposal.completed, ERR_ALREADY_COMPLETED);

        let owed = match self.payer_amount(&proposal, &caller) {
            Some(amount) => amount,
            None => sc_panic!(ERR_NOT_A_PAYER),
        };
        require!(self.paid(proposal_id, &caller).get(), ERR_NOT_YET_PAID);

        // Flag cleared before the transfer; a reentrant reclaim
        // finds ERR_NOT_YET_PAID. A failed transfer aborts the
        // transaction and the flag write with it.
        self.paid(proposal_id, &caller).set(false);
        self.send().direct_egld(&caller, &owed);

        self.reclaim_event(proposal_id, &caller, &owed);
    }

    // ========================================================
    // ENDPOINT: markCompleted
    // Any listed receiver freezes the pot once every payer has
    // paid. Scans the full payer list. Irreversible.
    // ========================================================

    #[endpoint(markCompleted)]
    fn mark_completed(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();

        let mut proposal = self.require_proposal(proposal_id);
        require!(
            self.receiver_amount(&proposal, &caller).is_some(),
            ERR_NOT_A_RECEIVER
        );
        require!(!proposal.completed, ERR_ALREADY_COMPLETED);

        for payer in proposal.payers.iter() {
            require!(self.paid(proposal_id, &payer).get(), ERR_NOT_FULLY_PAID);
        }

        proposal.completed = true;
        self.proposals(proposal_id).set(&proposal);

        self.proposal_completed_event(
            proposal_id,
            &caller,
            self.blockchain().get_block_timestamp(),
        );
    }

    // ========================================================
    // ENDPOINT: receiverWithdraw
    // A listed receiver takes their allotted share from the
    // frozen pot. At most once per receiver.
    // ========================================================

    #[endpoint(receiverWithdraw)]
    fn receiver_withdraw(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();

        let proposal = self.require_proposal(proposal_id);
        let allotted = match self.receiver_amount(&proposal, &caller) {
            Some(amount) => amount,
            None => sc_panic!(ERR_NOT_A_RECEIVER),
        };
        require!(proposal.completed, ERR_NOT_COMPLETED);
        require!(
            !self.withdrawn(proposal_id, &caller).get(),
            ERR_ALREADY_WITHDRAWN
        );

        // Flag set before the transfer; a reentrant withdraw
        // finds ERR_ALREADY_WITHDRAWN.
        self.withdrawn(proposal_id, &caller).set(true);
        self.send().direct_egld(&caller, &allotted);

        self.receiver_withdrawal_event(proposal_id, &caller, &allotted);
    }

    // ========================================================
    // ENDPOINT: tip
    // Value sent outside the structured deposit path. Accrues
    // unconditionally to the tip balance.
    // ========================================================

    #[endpoint(tip)]
    #[payable("EGLD")]
    fn tip(&self) {
        let caller = self.blockchain().get_caller();
        let payment = self.call_value().egld_value().clone_value();

        self.tip_balance().update(|balance| *balance += &payment);

        self.tip_received_event(&caller, &payment);
    }

    // ========================================================
    // ENDPOINT: withdrawTips
    // Only the tip owner drains the accrued balance, in full.
    // ========================================================

    #[endpoint(withdrawTips)]
    fn withdraw_tips(&self) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.tip_owner().get(), ERR_UNAUTHORIZED);

        let amount = self.tip_balance().get();
        require!(amount > 0u64, ERR_NOTHING_TO_CLAIM);

        // Balance zeroed before the transfer; a reentrant drain
        // finds ERR_NOTHING_TO_CLAIM.
        self.tip_balance().set(BigUint::zero());
        self.send().direct_egld(&caller, &amount);

        self.tips_withdrawn_event(&caller, &amount);
    }

    // ========================================================
    // ENDPOINT: setTipOwner
    // ========================================================

    #[endpoint(setTipOwner)]
    fn set_tip_owner(&self, new_owner: ManagedAddress) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.tip_owner().get(), ERR_UNAUTHORIZED);
        require!(!new_owner.is_zero(), ERR_ZERO_ADDRESS);

        self.tip_owner_changed_event(&caller, &new_owner);
        self.tip_owner().set(new_owner);
    }

    // ========================================================
    // INTERNAL: lookups and validation
    // ========================================================

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        require!(
            !self.proposals(proposal_id).is_empty(),
            ERR_PROPOSAL_NOT_FOUND
        );
        self.proposals(proposal_id).get()
    }

    /// The amount `who` owes in, or None if not a listed payer.
    fn payer_amount(
        &self,
        proposal: &Proposal<Self::Api>,
        who: &ManagedAddress,
    ) -> Option<BigUint> {
        for (payer, amount) in proposal.payers.iter().zip(proposal.payer_amounts.iter()) {
            if *payer == *who {
                return Some((*amount).clone());
            }
        }
        None
    }

    /// The amount `who` is owed out, or None if not a listed receiver.
    fn receiver_amount(
        &self,
        proposal: &Proposal<Self::Api>,
        who: &ManagedAddress,
    ) -> Option<BigUint> {
        for (receiver, amount) in proposal
            .receivers
            .iter()
            .zip(proposal.receiver_amounts.iter())
        {
            if *receiver == *who {
                return Some((*amount).clone());
            }
        }
        None
    }

    fn require_no_zero_address(&self, parties: &ManagedVec<ManagedAddress>) {
        for party in parties.iter() {
            require!(!party.is_zero(), ERR_ZERO_ADDRESS);
        }
    }

    fn require_no_duplicates(&self, parties: &ManagedVec<ManagedAddress>) {
        for (i, left) in parties.iter().enumerate() {
            for right in parties.iter().skip(i + 1) {
                require!(*left != *right, ERR_DUPLICATE_PARTY);
            }
        }
    }

    fn sum_amounts(&self, amounts: &ManagedVec<BigUint>) -> BigUint {
        let mut total = BigUint::zero();
        for amount in amounts.iter() {
            total += &*amount;
        }
        total
    }

    // ========================================================
    // VIEWS — read-only queries
    // ========================================================

    #[view(isValidProposal)]
    fn is_valid_proposal(&self, proposal_id: u64) -> bool {
        !self.proposals(proposal_id).is_empty()
    }

    #[view(isCompleted)]
    fn is_completed(&self, proposal_id: u64) -> bool {
        self.require_proposal(proposal_id).completed
    }

    #[view(getProposal)]
    fn get_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        self.require_proposal(proposal_id)
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> u64 {
        self.proposal_count().get()
    }

    #[view(getPayers)]
    fn get_payers(&self, proposal_id: u64) -> MultiValueEncoded<ManagedAddress> {
        let proposal = self.require_proposal(proposal_id);
        let mut result = MultiValueEncoded::new();
        for payer in proposal.payers.iter() {
            result.push((*payer).clone());
        }
        result
    }

    #[view(getReceivers)]
    fn get_receivers(&self, proposal_id: u64) -> MultiValueEncoded<ManagedAddress> {
        let proposal = self.require_proposal(proposal_id);
        let mut result = MultiValueEncoded::new();
        for receiver in proposal.receivers.iter() {
            result.push((*receiver).clone());
        }
        result
    }

    #[view(getPayerAmount)]
    fn get_payer_amount(&self, proposal_id: u64, payer: ManagedAddress) -> BigUint {
        let proposal = self.require_proposal(proposal_id);
        match self.payer_amount(&proposal, &payer) {
            Some(amount) => amount,
            None => sc_panic!(ERR_NOT_A_PAYER),
        }
    }

    #[view(getReceiverAmount)]
    fn get_receiver_amount(&self, proposal_id: u64, receiver: ManagedAddress) -> BigUint {
        let proposal = self.require_proposal(proposal_id);
        match self.receiver_amount(&proposal, &receiver) {
            Some(amount) => amount,
            None => sc_panic!(ERR_NOT_A_RECEIVER),
        }
    }

    #[view(isPaid)]
    fn is_paid(&self, proposal_id: u64, payer: ManagedAddress) -> bool {
        let proposal = self.require_proposal(proposal_id);
        require!(
            self.payer_amount(&proposal, &payer).is_some(),
            ERR_NOT_A_PAYER
        );
        self.paid(proposal_id, &payer).get()
    }

    #[view(isWithdrawn)]
    fn is_withdrawn(&self, proposal_id: u64, receiver: ManagedAddress) -> bool {
        let proposal = self.require_proposal(proposal_id);
        require!(
            self.receiver_amount(&proposal, &receiver).is_some(),
            ERR_NOT_A_RECEIVER
        );
        self.withdrawn(proposal_id, &receiver).get()
    }

    // Held value for one proposal: payer-indexed while open,
    // receiver-indexed once completed.
    #[view(getHeldAmount)]
    fn get_held_amount(&self, proposal_id: u64) -> BigUint {
        let proposal = self.require_proposal(proposal_id);
        let mut held = BigUint::zero();

        if proposal.completed {
            for (receiver, amount) in proposal
                .receivers
                .iter()
                .zip(proposal.receiver_amounts.iter())
            {
                if !self.withdrawn(proposal_id, &receiver).get() {
                    held += &*amount;
                }
            }
        } else {
            for (payer, amount) in proposal.payers.iter().zip(proposal.payer_amounts.iter()) {
                if self.paid(proposal_id, &payer).get() {
                    held += &*amount;
                }
            }
        }

        held
    }

    #[view(getTipBalance)]
    fn get_tip_balance(&self) -> BigUint {
        self.tip_balance().get()
    }

    #[view(getTipOwner)]
    fn get_tip_owner(&self) -> ManagedAddress {
        self.tip_owner().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] creator: &ManagedAddress,
        #[indexed] total_value: &BigUint,
        timestamp: u64,
    );

    #[event("deposit")]
    fn deposit_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] payer: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("reclaim")]
    fn reclaim_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] payer: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("proposalCompleted")]
    fn proposal_completed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] receiver: &ManagedAddress,
        timestamp: u64,
    );

    #[event("receiverWithdrawal")]
    fn receiver_withdrawal_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] receiver: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("tipReceived")]
    fn tip_received_event(&self, #[indexed] from: &ManagedAddress, amount: &BigUint);

    #[event("tipsWithdrawn")]
    fn tips_withdrawn_event(&self, #[indexed] owner: &ManagedAddress, amount: &BigUint);

    #[event("tipOwnerChanged")]
    fn tip_owner_changed_event(
        &self,
        #[indexed] previous: &ManagedAddress,
        #[indexed] new_owner: &ManagedAddress,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    // ── Tip account ──

    #[storage_mapper("tipOwner")]
    fn tip_owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("tipBalance")]
    fn tip_balance(&self) -> SingleValueMapper<BigUint>;

    // ── Registry ──

    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, proposal_id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    // ── Per-proposal sub-state ──

    #[storage_mapper("paid")]
    fn paid(&self, proposal_id: u64, payer: &ManagedAddress) -> SingleValueMapper<bool>;

    #[storage_mapper("withdrawn")]
    fn withdrawn(&self, proposal_id: u64, receiver: &ManagedAddress) -> SingleValueMapper<bool>;
}
