//! Awaitable, per-call bridge over Google Identity Services: idempotent SDK loading, one-shot
//! popup flows and One-Tap prompt settlement.
//!
//! The SDK is a browser-global script that fires callbacks on its own schedule. This crate hides
//! that behind [`flows::GoogleAuth`]: every popup or prompt call owns a fresh settlement cell, so
//! concurrent calls never receive each other's results and every call settles at most once.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod flows;
pub mod jwt;
pub mod loader;
pub mod obs;
pub mod sdk;
pub mod settle;
pub mod state;
#[cfg(any(test, feature = "test"))]
pub mod _preludet;

mod _prelude {
	pub use std::{
		collections::VecDeque,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use flows::GoogleAuth;
pub use url;
#[cfg(test)] use tokio as _;
