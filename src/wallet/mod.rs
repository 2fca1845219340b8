//! Wallet management: balance-holding accounts (cash, bank, credit card,
//! e-money) and their CRUD endpoints.

mod core;
mod endpoints;

pub use core::{
    NewWallet, Wallet, WalletKind, create_wallet, create_wallet_table, delete_wallet, get_wallet,
    list_wallets, update_wallet,
};
pub(crate) use core::adjust_balance;
pub use endpoints::{
    create_wallet_endpoint, delete_wallet_endpoint, list_wallets_endpoint, update_wallet_endpoint,
};
