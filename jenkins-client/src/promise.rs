//! Promise abstraction over asynchronous transport results
//!
//! A [`Promise`] is a cloneable handle on a shared future. Transports create
//! one with [`Promise::spawn`], which runs the request as a task on their
//! runtime. Adapters and tests use [`Promise::pending`] and settle it through
//! the matching [`Resolver`], the sending half of a oneshot channel.
//!
//! States only move `Pending -> Fulfilled` or `Pending -> Rejected`. A task
//! cancelled by its runtime, or a resolver dropped without settling, abandons
//! the promise: waiters get [`PromiseError::Abandoned`].
//!
//! Continuations registered with [`Promise::then`] run once each, in
//! registration order. On a spawned promise the runtime drives them; on a
//! promise without a runtime they run when the chained promise is inspected or
//! waited on.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::lock;

/// Failure of the promise machinery itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// The producing task or resolver went away without settling the promise
    #[error("promise was abandoned before it settled")]
    Abandoned,
}

/// Point-in-time state of a promise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

/// Outcome of a settled promise, returned by [`Promise::wait_settled`]
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Settled<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settled::Fulfilled(value) => Ok(value),
            Settled::Rejected(error) => Err(error),
        }
    }

    pub fn state(&self) -> PromiseState {
        match self {
            Settled::Fulfilled(_) => PromiseState::Fulfilled,
            Settled::Rejected(_) => PromiseState::Rejected,
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(error) => Settled::Rejected(error),
        }
    }
}

/// What a promise resolves to once nothing can change any more
pub type Outcome<T, E> = Result<Settled<T, E>, PromiseError>;

/// Completion of a registered continuation
type Completion = Shared<BoxFuture<'static, ()>>;

/// Read side of a one-shot asynchronous result
///
/// Cloning a promise yields another handle to the same outcome.
pub struct Promise<T, E> {
    outcome: Shared<BoxFuture<'static, Outcome<T, E>>>,
    /// Runtime driving continuations, when the promise came from one
    runtime: Option<Handle>,
    /// Last continuation registered on this promise or its clones
    tail: Arc<Mutex<Option<Completion>>>,
}

/// Write side of a [`Promise`]; settles it at most once
pub struct Resolver<T, E> {
    sender: oneshot::Sender<Settled<T, E>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            outcome: self.outcome.clone(),
            runtime: self.runtime.clone(),
            tail: Arc::clone(&self.tail),
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn from_future<F>(future: F, runtime: Option<Handle>) -> Self
    where
        F: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self {
            outcome: future.boxed().shared(),
            runtime,
            tail: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an unsettled promise together with its resolver
    pub fn pending() -> (Self, Resolver<T, E>) {
        let (sender, receiver) = oneshot::channel();
        let outcome = receiver.map(|received| received.map_err(|_| PromiseError::Abandoned));
        (Self::from_future(outcome, None), Resolver { sender })
    }

    pub fn fulfilled(value: T) -> Self {
        Self::from_future(futures::future::ready(Ok(Settled::Fulfilled(value))), None)
    }

    pub fn rejected(error: E) -> Self {
        Self::from_future(futures::future::ready(Ok(Settled::Rejected(error))), None)
    }

    /// Drive `future` as a task on `runtime` and settle with its output
    ///
    /// The task keeps running when every handle is dropped. Shutting the
    /// runtime down cancels it and abandons the promise. The runtime must have
    /// worker threads of its own: callers typically block on
    /// [`Promise::wait`] right after this returns.
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let task = runtime.spawn(future);
        let outcome = task.map(|joined| match joined {
            Ok(result) => Ok(result.into()),
            Err(_) => Err(PromiseError::Abandoned),
        });
        Self::from_future(outcome, Some(runtime.clone()))
    }

    /// Outcome if it is already known, without blocking
    fn peek(&self) -> Option<Outcome<T, E>> {
        self.outcome.clone().now_or_never()
    }

    /// An abandoned promise never settled and stays `Pending`
    pub fn state(&self) -> PromiseState {
        match self.peek() {
            Some(Ok(settled)) => settled.state(),
            _ => PromiseState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    pub fn is_fulfilled(&self) -> bool {
        self.state() == PromiseState::Fulfilled
    }

    pub fn is_rejected(&self) -> bool {
        self.state() == PromiseState::Rejected
    }

    /// Register a handler that sees every outcome, abandonment included
    ///
    /// Returns a new promise settled with whatever the handler returns.
    pub fn then_settled<U, R, F>(&self, handler: F) -> Promise<U, R>
    where
        U: Clone + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(Outcome<T, E>) -> Result<U, R> + Send + 'static,
    {
        self.chain(move |outcome| Ok(handler(outcome).into()))
    }

    /// Register fulfillment and rejection handlers
    ///
    /// Returns a new promise settled with whatever the called handler returns.
    /// Abandonment skips both handlers and abandons the new promise too.
    pub fn then<U, R, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, R>
    where
        U: Clone + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Result<U, R> + Send + 'static,
        G: FnOnce(E) -> Result<U, R> + Send + 'static,
    {
        self.chain(move |outcome| {
            outcome.map(|settled| match settled {
                Settled::Fulfilled(value) => on_fulfilled(value).into(),
                Settled::Rejected(error) => on_rejected(error).into(),
            })
        })
    }

    /// `then` without a rejection handler: errors propagate unchanged
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.then(on_fulfilled, |error| Err(error))
    }

    /// `then` without a fulfillment handler: values propagate unchanged
    pub fn otherwise<R, G>(&self, on_rejected: G) -> Promise<T, R>
    where
        R: Clone + Send + Sync + 'static,
        G: FnOnce(E) -> Result<T, R> + Send + 'static,
    {
        self.then(Ok, on_rejected)
    }

    fn chain<U, R, F>(&self, continuation: F) -> Promise<U, R>
    where
        U: Clone + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
        F: FnOnce(Outcome<T, E>) -> Outcome<U, R> + Send + 'static,
    {
        let outcome = self.outcome.clone();
        let chained = {
            let mut tail = lock(&self.tail);
            let previous = tail.take();
            let chained = Promise::from_future(
                async move {
                    // Registration order: wait for the continuation before us
                    if let Some(previous) = previous {
                        previous.await;
                    }
                    continuation(outcome.await)
                },
                self.runtime.clone(),
            );
            *tail = Some(chained.outcome.clone().map(|_| ()).boxed().shared());
            chained
        };
        chained.drive();
        chained
    }

    /// Run the continuation on the runtime, or right away if it can finish now
    fn drive(&self) {
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn(self.outcome.clone());
            }
            None => {
                let _ = self.peek();
            }
        }
    }

    /// Block until the promise settles and unwrap it
    ///
    /// Returns the fulfilled value or the rejection. An abandoned promise is
    /// reported through `E`'s conversion from [`PromiseError`]. Must not be
    /// called from inside an async task.
    pub fn wait(&self) -> Result<T, E>
    where
        E: From<PromiseError>,
    {
        match self.wait_settled() {
            Ok(settled) => settled.into_result(),
            Err(error) => Err(E::from(error)),
        }
    }

    /// Block until the promise settles without unwrapping the outcome
    pub fn wait_settled(&self) -> Outcome<T, E> {
        futures::executor::block_on(self.outcome.clone())
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.peek() {
            Some(Ok(Settled::Fulfilled(_))) => "fulfilled",
            Some(Ok(Settled::Rejected(_))) => "rejected",
            Some(Err(PromiseError::Abandoned)) => "abandoned",
            None => "pending",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}

impl<T, E> Resolver<T, E> {
    pub fn fulfill(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn reject(self, error: E) {
        self.complete(Err(error));
    }

    pub fn complete(self, result: Result<T, E>) {
        // Every promise handle is gone; nobody is left to tell
        let _ = self.sender.send(result.into());
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}
