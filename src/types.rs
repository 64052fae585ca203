multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal — one escrow instance
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    /// Distinct identities owing into the pot. Never empty, no zero address.
    pub payers: ManagedVec<M, ManagedAddress<M>>,
    /// payer_amounts[i] is what payers[i] owes. Same length as payers.
    pub payer_amounts: ManagedVec<M, BigUint<M>>,
    /// Distinct identities owed out of the pot. Never empty, no zero address.
    pub receivers: ManagedVec<M, ManagedAddress<M>>,
    /// receiver_amounts[j] is what receivers[j] is owed. Same length as
    /// receivers; the two sides sum to the same total, checked at creation.
    pub receiver_amounts: ManagedVec<M, BigUint<M>>,
    /// False until a listed receiver freezes the fully funded pot. Never unset.
    pub completed: bool,
    pub created_at: u64,
}
