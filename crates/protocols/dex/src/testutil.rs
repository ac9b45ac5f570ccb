//! In-memory ledger for driving the orchestration flows in tests.
//!
//! Records every boundary call so tests can assert ordering and exact
//! arguments, and lets failures be injected at each seam (quote,
//! submission, finality).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use ledger_client::{Ledger, LedgerError, PendingTransaction, Receipt, SendOptions};
use pairswap_core::{Address, BaseUnits, DexConfig, TradePath, TxId};

/// Address made of one repeated byte, e.g. `addr(0xaa)`.
pub fn addr(byte: u8) -> Address {
    Address::new(format!("0x{}", format!("{byte:02x}").repeat(20)))
}

pub fn account() -> Address {
    addr(0x01)
}

pub fn factory() -> Address {
    addr(0xfa)
}

pub fn router() -> Address {
    addr(0xee)
}

pub fn token_a() -> Address {
    addr(0xa0)
}

pub fn token_b() -> Address {
    addr(0xb0)
}

pub fn pair() -> Address {
    addr(0xcc)
}

/// Default configuration every flow test starts from.
pub fn test_config() -> DexConfig {
    DexConfig::new(factory(), router(), token_a(), token_b())
}

/// One recorded boundary call, with the arguments assertions care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Decimals(Address),
    BalanceOf {
        token: Address,
        holder: Address,
    },
    Allowance {
        token: Address,
        holder: Address,
        spender: Address,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: BaseUnits,
        gas_limit: u64,
    },
    GetAmountsOut {
        amount_in: BaseUnits,
    },
    Swap {
        amount_in: BaseUnits,
        min_amount_out: BaseUnits,
        recipient: Address,
        deadline: u64,
        gas_limit: u64,
    },
    AddLiquidity {
        amount_a: BaseUnits,
        amount_b: BaseUnits,
        min_a: BaseUnits,
        min_b: BaseUnits,
        recipient: Address,
        deadline: u64,
    },
    GetPair,
    CreatePair,
    GetReserves,
    Token0,
    Token1,
}

/// Hooks for pausing the first balance read mid-flight; used to hold an
/// intent open while a second one is attempted.
#[derive(Clone)]
pub struct BalanceGate {
    pub entered: Arc<Semaphore>,
    pub release: Arc<Semaphore>,
}

struct Inner {
    decimals: HashMap<Address, u32>,
    /// (token, holder) -> balance
    balances: HashMap<(Address, Address), BaseUnits>,
    /// (token, spender) -> allowance for the test account
    allowances: HashMap<(Address, Address), BaseUnits>,
    quote_out: Option<BaseUnits>,
    quote_reject: Option<String>,
    pair: Address,
    reserves: (BaseUnits, BaseUnits),
    token0: Address,
    token1: Address,
    pair_on_create: Address,
    swap_reject: Option<String>,
    swap_finality_reject: Option<String>,
    liquidity_reject: Option<String>,
    balance_gate: Option<BalanceGate>,
    calls: Vec<Call>,
    next_tx: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            decimals: HashMap::new(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            quote_out: None,
            quote_reject: None,
            pair: Address::zero(),
            reserves: (BaseUnits::zero(), BaseUnits::zero()),
            token0: token_a(),
            token1: token_b(),
            pair_on_create: pair(),
            swap_reject: None,
            swap_finality_reject: None,
            liquidity_reject: None,
            balance_gate: None,
            calls: Vec::new(),
            next_tx: 0,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockLedger {
    inner: Arc<Mutex<Inner>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn set_decimals(&self, token: &Address, decimals: u32) {
        self.lock().decimals.insert(token.clone(), decimals);
    }

    pub fn set_balance(&self, token: &Address, holder: &Address, amount: BaseUnits) {
        self.lock()
            .balances
            .insert((token.clone(), holder.clone()), amount);
    }

    pub fn set_allowance(&self, token: &Address, spender: &Address, amount: BaseUnits) {
        self.lock()
            .allowances
            .insert((token.clone(), spender.clone()), amount);
    }

    pub fn set_quote_out(&self, out: BaseUnits) {
        self.lock().quote_out = Some(out);
    }

    pub fn reject_quotes(&self, reason: &str) {
        self.lock().quote_reject = Some(reason.to_string());
    }

    /// Register a live pair with reserves in the pool's storage order.
    pub fn set_pool(
        &self,
        pair: &Address,
        token0: &Address,
        token1: &Address,
        reserve0: BaseUnits,
        reserve1: BaseUnits,
    ) {
        let mut inner = self.lock();
        inner.pair = pair.clone();
        inner.token0 = token0.clone();
        inner.token1 = token1.clone();
        inner.reserves = (reserve0, reserve1);
    }

    pub fn reject_swap_submission(&self, reason: &str) {
        self.lock().swap_reject = Some(reason.to_string());
    }

    pub fn reject_swap_finality(&self, reason: &str) {
        self.lock().swap_finality_reject = Some(reason.to_string());
    }

    pub fn reject_liquidity_submission(&self, reason: &str) {
        self.lock().liquidity_reject = Some(reason.to_string());
    }

    /// Pause the next balance reads until the returned gate is released.
    pub fn gate_balance_reads(&self) -> BalanceGate {
        let gate = BalanceGate {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        };
        self.lock().balance_gate = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Approve calls recorded, in order.
    pub fn approvals(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Approve { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }

    fn next_tx(&self) -> TxId {
        let mut inner = self.lock();
        inner.next_tx += 1;
        TxId::new(format!("{:064x}", inner.next_tx))
    }

    fn ok_pending(&self) -> MockPending {
        MockPending {
            tx_id: self.next_tx(),
            outcome: Ok(()),
        }
    }
}

pub struct MockPending {
    tx_id: TxId,
    outcome: Result<(), LedgerError>,
}

#[async_trait]
impl PendingTransaction for MockPending {
    fn tx_id(&self) -> TxId {
        self.tx_id.clone()
    }

    async fn await_finality(self) -> Result<Receipt, LedgerError> {
        self.outcome?;
        Ok(Receipt {
            tx_id: self.tx_id,
            block_number: 1,
            finalized_at: 0,
        })
    }
}

#[async_trait]
impl Ledger for MockLedger {
    type Pending = MockPending;

    async fn request_account(&self) -> Result<Address, LedgerError> {
        Ok(account())
    }

    async fn decimals(&self, token: &Address) -> Result<u32, LedgerError> {
        self.record(Call::Decimals(token.clone()));
        self.lock()
            .decimals
            .get(token)
            .copied()
            .ok_or_else(|| LedgerError::transport("decimals not seeded for token"))
    }

    async fn balance_of(&self, token: &Address, holder: &Address) -> Result<BaseUnits, LedgerError> {
        self.record(Call::BalanceOf {
            token: token.clone(),
            holder: holder.clone(),
        });
        let gate = self.lock().balance_gate.clone();
        if let Some(gate) = gate {
            gate.entered.add_permits(1);
            let permit = gate
                .release
                .acquire()
                .await
                .map_err(|_| LedgerError::transport("balance gate closed"))?;
            permit.forget();
        }
        Ok(self
            .lock()
            .balances
            .get(&(token.clone(), holder.clone()))
            .cloned()
            .unwrap_or_else(BaseUnits::zero))
    }

    async fn allowance(
        &self,
        token: &Address,
        holder: &Address,
        spender: &Address,
    ) -> Result<BaseUnits, LedgerError> {
        self.record(Call::Allowance {
            token: token.clone(),
            holder: holder.clone(),
            spender: spender.clone(),
        });
        Ok(self
            .lock()
            .allowances
            .get(&(token.clone(), spender.clone()))
            .cloned()
            .unwrap_or_else(BaseUnits::zero))
    }

    async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: &BaseUnits,
        options: SendOptions,
    ) -> Result<Self::Pending, LedgerError> {
        self.record(Call::Approve {
            token: token.clone(),
            spender: spender.clone(),
            amount: amount.clone(),
            gas_limit: options.gas_limit,
        });
        self.lock()
            .allowances
            .insert((token.clone(), spender.clone()), amount.clone());
        Ok(self.ok_pending())
    }

    async fn get_amounts_out(
        &self,
        _router: &Address,
        amount_in: &BaseUnits,
        path: &TradePath,
    ) -> Result<Vec<BaseUnits>, LedgerError> {
        self.record(Call::GetAmountsOut {
            amount_in: amount_in.clone(),
        });
        let inner = self.lock();
        if let Some(reason) = &inner.quote_reject {
            return Err(LedgerError::rejected(reason.clone()));
        }
        match &inner.quote_out {
            Some(out) => {
                let mut amounts = vec![amount_in.clone()];
                amounts.resize(path.len() - 1, BaseUnits::zero());
                amounts.push(out.clone());
                Ok(amounts)
            }
            None => Err(LedgerError::rejected("no pool for path")),
        }
    }

    async fn swap_exact_tokens_for_tokens(
        &self,
        _router: &Address,
        amount_in: &BaseUnits,
        min_amount_out: &BaseUnits,
        _path: &TradePath,
        recipient: &Address,
        deadline: u64,
        options: SendOptions,
    ) -> Result<Self::Pending, LedgerError> {
        self.record(Call::Swap {
            amount_in: amount_in.clone(),
            min_amount_out: min_amount_out.clone(),
            recipient: recipient.clone(),
            deadline,
            gas_limit: options.gas_limit,
        });
        let inner = self.lock();
        if let Some(reason) = &inner.swap_reject {
            return Err(LedgerError::rejected(reason.clone()));
        }
        let outcome = match &inner.swap_finality_reject {
            Some(reason) => Err(LedgerError::rejected(reason.clone())),
            None => Ok(()),
        };
        drop(inner);
        Ok(MockPending {
            tx_id: self.next_tx(),
            outcome,
        })
    }

    async fn add_liquidity(
        &self,
        _router: &Address,
        _token_a: &Address,
        _token_b: &Address,
        amount_a: &BaseUnits,
        amount_b: &BaseUnits,
        min_a: &BaseUnits,
        min_b: &BaseUnits,
        recipient: &Address,
        deadline: u64,
        _options: SendOptions,
    ) -> Result<Self::Pending, LedgerError> {
        self.record(Call::AddLiquidity {
            amount_a: amount_a.clone(),
            amount_b: amount_b.clone(),
            min_a: min_a.clone(),
            min_b: min_b.clone(),
            recipient: recipient.clone(),
            deadline,
        });
        if let Some(reason) = self.lock().liquidity_reject.clone() {
            return Err(LedgerError::rejected(reason));
        }
        Ok(self.ok_pending())
    }

    async fn get_pair(
        &self,
        _factory: &Address,
        _token_a: &Address,
        _token_b: &Address,
    ) -> Result<Address, LedgerError> {
        self.record(Call::GetPair);
        Ok(self.lock().pair.clone())
    }

    async fn create_pair(
        &self,
        _factory: &Address,
        _token_a: &Address,
        _token_b: &Address,
        _options: SendOptions,
    ) -> Result<Self::Pending, LedgerError> {
        self.record(Call::CreatePair);
        let mut inner = self.lock();
        let created = inner.pair_on_create.clone();
        inner.pair = created;
        drop(inner);
        Ok(self.ok_pending())
    }

    async fn get_reserves(&self, _pair: &Address) -> Result<(BaseUnits, BaseUnits), LedgerError> {
        self.record(Call::GetReserves);
        Ok(self.lock().reserves.clone())
    }

    async fn token0(&self, _pair: &Address) -> Result<Address, LedgerError> {
        self.record(Call::Token0);
        Ok(self.lock().token0.clone())
    }

    async fn token1(&self, _pair: &Address) -> Result<Address, LedgerError> {
        self.record(Call::Token1);
        Ok(self.lock().token1.clone())
    }
}

/// An initialized core over a fresh mock, plus the mock handle for
/// seeding state and asserting calls.
pub async fn ready_dex() -> (crate::Dex<MockLedger>, MockLedger) {
    let mock = MockLedger::new();
    let dex = crate::Dex::new(mock.clone(), test_config());
    dex.initialize().await.unwrap();
    (dex, mock)
}
