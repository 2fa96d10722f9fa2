//! Client for the vote-card program.
//!
//! The program owns every rule: vote counts, duplicate-vote rejection, fee
//! collection and rent reclamation. This crate derives its addresses, encodes
//! its instructions, decodes its accounts and drives transactions through a
//! [`LedgerTransport`](transport::LedgerTransport).
//!
//! Screen code depends on [`VoteService`](service::VoteService);
//! [`VoteCardClient`](client::VoteCardClient) implements it over any
//! transport.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "dev-context-only-utils"))]
pub mod in_memory;
pub mod instruction;
pub mod network;
pub mod pda;
pub mod program;
pub mod service;
pub mod state;
pub mod transport;
pub mod wallet;

pub use {
    client::VoteCardClient,
    config::ClientConfig,
    error::{Result, ValidationError, VoteCardError},
    network::Network,
    program::{id, AccountLayout, Deployment},
    service::VoteService,
    state::VoteCard,
    transport::{LedgerTransport, RpcTransport},
    wallet::WalletAdapter,
};
