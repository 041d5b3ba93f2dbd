//! Core building blocks of a push-based reactive library.
//!
//! The crate provides the observable/observer protocol, the subject family
//! for multicast, a composable subscription (cancellation) system and the
//! scheduled operators that tie them together. Sources emit on whichever
//! thread the current callback runs on; schedulers are supplied by the
//! caller and any `futures` executor works out of the box.
//!
//! ```
//! use rx_core::prelude::*;
//!
//! let mut collected = vec![];
//! observable::from_iter(1..=4)
//!   .filter(|v| v % 2 == 0)
//!   .scan_initial(0, |acc, v| acc + v)
//!   .subscribe(move |v| collected.push(v));
//! ```

pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
