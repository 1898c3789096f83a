//! Statecraft: declarative finite state machines.
//!
//! A machine is described once (initial state, an ordered transition table,
//! named guards and actions, initial context and props) and then driven by
//! events. Each event resolves to at most one transition, deterministically:
//! guards filter the candidates, the highest priority wins, and table order
//! breaks ties.
//!
//! # Core Concepts
//!
//! - **State**: a tag implementing [`State`], usually declared with [`state_enum!`]
//! - **Context**: data the machine owns and evolves through action results
//! - **Props**: data owned by the caller and pushed in with `sync_props`
//! - **Guards / Actions**: named handlers resolved when an event is dispatched
//! - **Listeners**: callbacks receiving frozen snapshots after every change
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::MachineBuilder;
//! use statecraft::core::Message;
//! use statecraft::runtime::Transition;
//! use statecraft::state_enum;
//! use serde_json::json;
//!
//! state_enum! {
//!     enum Wallet {
//!         Open,
//!         Frozen,
//!     }
//! }
//!
//! let machine = MachineBuilder::<Wallet, Message>::new()
//!     .initial(Wallet::Open)
//!     .context(json!({"balance": 0}).as_object().unwrap().clone())
//!     .transition(Transition::new(Wallet::Open, "DEPOSIT", Wallet::Open).with_action("deposit"))
//!     .transition(Transition::new(Wallet::Open, "FREEZE", Wallet::Frozen))
//!     .action("deposit", |args| {
//!         let balance = args.context["balance"].as_i64().unwrap_or(0);
//!         let amount = args.event.get("amount").and_then(|v| v.as_i64()).unwrap_or(0);
//!         json!({"balance": balance + amount}).as_object().cloned()
//!     })
//!     .build()
//!     .unwrap();
//!
//! machine.start();
//! machine.send(Message::new("DEPOSIT").with("amount", json!(40))).unwrap();
//! machine.send(Message::new("FREEZE")).unwrap();
//! machine.send(Message::new("DEPOSIT").with("amount", json!(5))).unwrap();
//!
//! assert!(machine.matches(&[Wallet::Frozen]));
//! assert_eq!(machine.get_context()["balance"], json!(40));
//! ```

pub mod builder;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder, MachineConfig};
pub use crate::core::{Data, Event, Message, Snapshot, State};
pub use crate::runtime::{
    ConfigurationError, Machine, SubscribeOptions, Subscription, Transition, WeakMachine,
};
