//! `st-kernel` — the discrete-event kernel under the station simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`clock`]    | `Clock<T>` — `(time, seq)`-ordered resumption queue        |
//! | [`resource`] | `ResourceTable`, `Grant` — FIFO mutexes, joint acquisition |
//! | [`error`]    | `KernelError`, `KernelResult<T>`                           |
//!
//! # Execution model (summary)
//!
//! ```text
//! loop:
//!   (t, item) = clock.pop_next()      // earliest time, earliest submission
//!   now       = t
//!   resume(item)                      // runs until its next suspension:
//!                                     //   resource wait  → table queues it
//!                                     //   timed dwell    → clock.after(d, item)
//!   release(...) → granted waiters    → clock.schedule_now(waiter)
//! ```
//!
//! Everything runs on one thread; "concurrency" is only the interleaving of
//! suspended items inside one clock.

pub mod clock;
pub mod error;
pub mod resource;


pub use clock::Clock;
pub use error::{KernelError, KernelResult};
pub use resource::{Grant, ResourceTable};
