use multiversx_sc::proxy_imports::*;

use crate::types::Proposal;

pub struct EscrowPoolProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for EscrowPoolProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = EscrowPoolProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        EscrowPoolProxyMethods { wrapped_tx: tx }
    }
}

pub struct EscrowPoolProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, Gas> EscrowPoolProxyMethods<Env, From, (), Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    Gas: TxGas<Env>,
{
    pub fn init(self) -> TxTypedDeploy<Env, From, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_deploy()
            .original_result()
    }
}

impl<Env, From, To, Gas> EscrowPoolProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn upgrade(self) -> TxTypedUpgrade<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_upgrade()
            .original_result()
    }
}

impl<Env, From, To, Gas> EscrowPoolProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn create_proposal<
        Arg0: ProxyArg<ManagedVec<Env::Api, ManagedAddress<Env::Api>>>,
        Arg1: ProxyArg<ManagedVec<Env::Api, BigUint<Env::Api>>>,
        Arg2: ProxyArg<ManagedVec<Env::Api, ManagedAddress<Env::Api>>>,
        Arg3: ProxyArg<ManagedVec<Env::Api, BigUint<Env::Api>>>,
    >(
        self,
        payers: Arg0,
        payer_amounts: Arg1,
        receivers: Arg2,
        receiver_amounts: Arg3,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, u64> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("createProposal")
            .argument(&payers)
            .argument(&payer_amounts)
            .argument(&receivers)
            .argument(&receiver_amounts)
            .original_result()
    }

    pub fn deposit<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, (), Gas, ()> {
        self.wrapped_tx
            .raw_call("deposit")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn reclaim<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("reclaim")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn mark_completed<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("markCompleted")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn receiver_withdraw<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("receiverWithdraw")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn tip(self) -> TxTypedCall<Env, From, To, (), Gas, ()> {
        self.wrapped_tx.raw_call("tip").original_result()
    }

    pub fn withdraw_tips(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("withdrawTips")
            .original_result()
    }

    pub fn set_tip_owner<Arg0: ProxyArg<ManagedAddress<Env::Api>>>(
        self,
        new_owner: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("setTipOwner")
            .argument(&new_owner)
            .original_result()
    }

    pub fn is_valid_proposal<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isValidProposal")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn is_completed<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isCompleted")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn get_proposal<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, Proposal<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getProposal")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn get_proposal_count(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, u64> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getProposalCount")
            .original_result()
    }

    pub fn get_payers<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValueEncoded<Env::Api, ManagedAddress<Env::Api>>>
    {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getPayers")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn get_receivers<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValueEncoded<Env::Api, ManagedAddress<Env::Api>>>
    {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getReceivers")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn get_payer_amount<
        Arg0: ProxyArg<u64>,
        Arg1: ProxyArg<ManagedAddress<Env::Api>>,
    >(
        self,
        proposal_id: Arg0,
        payer: Arg1,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getPayerAmount")
            .argument(&proposal_id)
            .argument(&payer)
            .original_result()
    }

    pub fn get_receiver_amount<
        Arg0: ProxyArg<u64>,
        Arg1: ProxyArg<ManagedAddress<Env::Api>>,
    >(
        self,
        proposal_id: Arg0,
        receiver: Arg1,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getReceiverAmount")
            .argument(&proposal_id)
            .argument(&receiver)
            .original_result()
    }

    pub fn is_paid<Arg0: ProxyArg<u64>, Arg1: ProxyArg<ManagedAddress<Env::Api>>>(
        self,
        proposal_id: Arg0,
        payer: Arg1,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isPaid")
            .argument(&proposal_id)
            .argument(&payer)
            .original_result()
    }

    pub fn is_withdrawn<Arg0: ProxyArg<u64>, Arg1: ProxyArg<ManagedAddress<Env::Api>>>(
        self,
        proposal_id: Arg0,
        receiver: Arg1,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isWithdrawn")
            .argument(&proposal_id)
            .argument(&receiver)
            .original_result()
    }

    pub fn get_held_amount<Arg0: ProxyArg<u64>>(
        self,
        proposal_id: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getHeldAmount")
            .argument(&proposal_id)
            .original_result()
    }

    pub fn get_tip_balance(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTipBalance")
            .original_result()
    }

    pub fn get_tip_owner(
        self,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedAddress<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTipOwner")
            .original_result()
    }
}
