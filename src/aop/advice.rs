// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The advice contract and the invocation handed to each advice.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;

use super::advisor::Advisor;
use super::signature::MethodSignature;

/// Invariant lifetime brand tying outcomes to the invocation that made them.
type Brand<'a> = PhantomData<fn(&'a ()) -> &'a ()>;

/// Result of proceeding down an interceptor chain.
pub type Outcome<'a> = Result<Returned<'a>, Raised<'a>>;

/// The value returned by the real method, type-erased while it travels
/// back through the chain.
///
/// Only the end of the chain creates these, so an advice can inspect the
/// value but never substitute its own.
pub struct Returned<'a> {
    value: Box<dyn Any>,
    _brand: Brand<'a>,
}

impl<'a> Returned<'a> {
    pub(crate) fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            _brand: PhantomData,
        }
    }

    /// Borrow the value if it has type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub(crate) fn into_value<T: 'static>(self) -> Option<T> {
        self.value.downcast().ok().map(|boxed| *boxed)
    }
}

impl fmt::Debug for Returned<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Returned").finish_non_exhaustive()
    }
}

/// The error raised by the real method, travelling back through the chain.
///
/// Advices observe it and must hand it on unchanged; the caller receives
/// the original error value.
pub struct Raised<'a> {
    error: anyhow::Error,
    _brand: Brand<'a>,
}

impl<'a> Raised<'a> {
    pub(crate) fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: anyhow::Error::new(error),
            _brand: PhantomData,
        }
    }

    /// The raised error.
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Borrow the error if it has type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref()
    }

    pub(crate) fn into_error<E>(self) -> Option<E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast().ok()
    }
}

impl fmt::Display for Raised<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl fmt::Debug for Raised<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Raised").field(&self.error).finish()
    }
}

/// A unit of cross-cutting behaviour.
///
/// An advice receives the [`Invocation`], may act before and after calling
/// [`Invocation::proceed`], and returns what `proceed` produced.
///
/// # Example
///
/// ```rust,ignore
/// struct Audit;
///
/// impl Advice for Audit {
///     fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a> {
///         tracing::info!(method = %invocation.signature(), "audit");
///         invocation.proceed()
///     }
/// }
/// ```
pub trait Advice: Send + Sync {
    fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a>;
}

/// One call travelling through an interceptor chain.
///
/// Proceeding consumes the invocation, so every advice reaches the next
/// link at most once and the real method runs at most once.
pub struct Invocation<'a> {
    signature: &'a MethodSignature,
    arguments: &'a [&'a dyn fmt::Debug],
    remaining: &'a [&'a Advisor],
    target: Box<dyn FnOnce() -> Outcome<'a> + 'a>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        signature: &'a MethodSignature,
        arguments: &'a [&'a dyn fmt::Debug],
        remaining: &'a [&'a Advisor],
        target: Box<dyn FnOnce() -> Outcome<'a> + 'a>,
    ) -> Self {
        Self {
            signature,
            arguments,
            remaining,
            target,
        }
    }

    pub fn signature(&self) -> &MethodSignature {
        self.signature
    }

    pub fn method_name(&self) -> &'static str {
        self.signature.name()
    }

    pub fn arguments(&self) -> &[&'a dyn fmt::Debug] {
        self.arguments
    }

    /// Run the rest of the chain: the next matching advice, or the real
    /// method once every advice has been entered.
    pub fn proceed(self) -> Outcome<'a> {
        match self.remaining.split_first() {
            Some((advisor, rest)) => {
                let next = Invocation {
                    remaining: rest,
                    ..self
                };
                advisor.advice().invoke(next)
            }
            None => (self.target)(),
        }
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("signature", self.signature)
            .field("arguments", &self.arguments)
            .field("remaining", &self.remaining.len())
            .finish_non_exhaustive()
    }
}
