//! One-shot settlement cells.
//!
//! A [`Settler`] is the write side of a single pending interaction. It can be cloned into every
//! callback the SDK may fire; the first [`Settler::settle`] call wins and every later call is a
//! no-op that returns `false`. The paired [`Settlement`] future yields the winning value, or
//! [`Abandoned`] when every settler is dropped without settling.

// std
use std::task::{Context, Poll};
// crates.io
use futures::channel::oneshot;
// self
use crate::_prelude::*;

/// Creates a fresh settlement cell. Never share one cell between two calls.
pub fn cell<T>() -> (Settler<T>, Settlement<T>) {
	let (tx, rx) = oneshot::channel();

	(Settler(Arc::new(Mutex::new(Some(tx)))), Settlement(rx))
}

/// Write side of a settlement cell.
pub struct Settler<T>(Arc<Mutex<Option<oneshot::Sender<T>>>>);
impl<T> Settler<T> {
	/// Delivers `value` if the cell is still pending; returns whether this call settled it.
	pub fn settle(&self, value: T) -> bool {
		let Some(tx) = self.0.lock().take() else {
			return false;
		};

		// A dropped receiver still counts as settled; the outcome simply has no reader.
		let _ = tx.send(value);

		true
	}

	/// Returns true once any clone of this settler has settled the cell.
	pub fn is_settled(&self) -> bool {
		self.0.lock().is_none()
	}
}
impl<T> Clone for Settler<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<T> Debug for Settler<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Settler").field("settled", &self.is_settled()).finish()
	}
}

/// Raised when every [`Settler`] was dropped before settling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Settlement cell was dropped before it settled.")]
pub struct Abandoned;

/// Read side of a settlement cell.
#[derive(Debug)]
pub struct Settlement<T>(oneshot::Receiver<T>);
impl<T> Future for Settlement<T> {
	type Output = Result<T, Abandoned>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.0).poll(cx).map_err(|_| Abandoned)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn second_settlement_keeps_first_value() {
		let (settler, settlement) = cell::<&str>();
		let late = settler.clone();

		assert!(settler.settle("first"));
		assert!(!late.settle("second"));
		assert!(late.is_settled());
		assert_eq!(settlement.await, Ok("first"));
	}

	#[tokio::test]
	async fn dropping_every_settler_abandons() {
		let (settler, settlement) = cell::<u8>();
		let clone = settler.clone();

		drop(settler);
		drop(clone);

		assert_eq!(settlement.await, Err(Abandoned));
	}

	#[test]
	fn settling_without_reader_still_marks_settled() {
		let (settler, settlement) = cell::<u8>();

		drop(settlement);

		assert!(settler.settle(1));
		assert!(!settler.settle(2));
	}
}
