// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use crate::aop::{Advice, Invocation, Outcome};
use crate::trace::LogTrace;

/// Writes a begin line before the call and an end or exception line after.
///
/// The message is the method's short form, `Type.method()`.
#[derive(Clone)]
pub struct LogTraceAdvice {
    log_trace: Arc<dyn LogTrace>,
}

impl LogTraceAdvice {
    pub fn new(log_trace: Arc<dyn LogTrace>) -> Self {
        Self { log_trace }
    }

    pub fn log_trace(&self) -> &Arc<dyn LogTrace> {
        &self.log_trace
    }
}

impl Advice for LogTraceAdvice {
    fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a> {
        let status = self.log_trace.begin(&invocation.signature().short_string());
        let outcome = invocation.proceed();
        match &outcome {
            Ok(_) => self.log_trace.end(status),
            Err(raised) => self.log_trace.exception(status, raised.error()),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aop::{AdvisorChain, Advisor, TargetType};
    use crate::trace::{MemoryWriter, ThreadLocalLogTrace};
    use std::fmt;

    #[derive(Debug)]
    struct Rejected;

    impl fmt::Display for Rejected {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "rejected")
        }
    }

    impl std::error::Error for Rejected {}

    fn traced_chain() -> (AdvisorChain, MemoryWriter) {
        let writer = MemoryWriter::new();
        let trace = Arc::new(ThreadLocalLogTrace::with_writer(Arc::new(writer.clone())));
        let advisor = Advisor::always("log-trace", LogTraceAdvice::new(trace)).shared();
        let chain = AdvisorChain::new(TargetType::named("app::orders::OrderRepository"), &[advisor]);
        (chain, writer)
    }

    #[test]
    fn test_traces_successful_call() {
        let (chain, writer) = traced_chain();
        let value: Result<u8, Rejected> = chain.invoke("save", &[], || Ok(1));
        assert_eq!(value.unwrap(), 1);

        let lines = writer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" OrderRepository.save()"));
        assert!(lines[1].contains(" OrderRepository.save() time="));
    }

    #[test]
    fn test_traces_and_returns_error() {
        let (chain, writer) = traced_chain();
        let value: Result<u8, Rejected> = chain.invoke("save", &[], || Err(Rejected));
        assert!(matches!(value, Err(Rejected)));
        assert!(writer.lines()[1].contains("OrderRepository.save() ex=rejected time="));
    }
}
