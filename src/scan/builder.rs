//! Result accumulation per requested return shape.

use crate::matcher::Rtn;

use super::event::MatchEvent;
use super::ScanResult;

/// Returns the empty form of a shape, threading the context through for
/// `Rtn::Context`.
pub(crate) fn empty_result<C>(rtn: Rtn, context: Option<C>) -> ScanResult<C> {
    match rtn {
        Rtn::Context => ScanResult::Context(context),
        Rtn::Key => ScanResult::Keys(Vec::new()),
        Rtn::Value => ScanResult::Values(Vec::new()),
        Rtn::Entry => ScanResult::Entries(Vec::new()),
        Rtn::Property => ScanResult::Properties(Vec::new()),
        Rtn::Parent => ScanResult::Parent(Vec::new()),
        Rtn::Parents => ScanResult::Parents(Vec::new()),
        Rtn::Bool => ScanResult::Bool(false),
        Rtn::Count => ScanResult::Count(0),
    }
}

/// Folds accepted match events into the requested shape.
///
/// `finish` is safe to call with zero recorded matches; it returns the
/// shape's empty form.
pub(crate) struct ResultBuilder<C> {
    result: ScanResult<C>,
}

impl<C> ResultBuilder<C> {
    pub(crate) fn new(rtn: Rtn) -> Self {
        Self {
            result: empty_result(rtn, None),
        }
    }

    pub(crate) fn on_match(&mut self, event: &MatchEvent<'_, C>) {
        match &mut self.result {
            ScanResult::Context(_) => {}
            ScanResult::Keys(keys) => keys.push(event.key()),
            ScanResult::Values(values) => values.push(event.value()),
            ScanResult::Entries(entries) => entries.push(event.entry()),
            ScanResult::Properties(properties) => properties.push(event.property()),
            ScanResult::Parent(parents) => parents.push(event.parent()),
            ScanResult::Parents(chains) => chains.push(event.parents()),
            ScanResult::Bool(matched) => *matched = true,
            ScanResult::Count(count) => *count += 1,
        }
    }

    pub(crate) fn finish(mut self, context: Option<C>) -> ScanResult<C> {
        if let ScanResult::Context(slot) = &mut self.result {
            *slot = context;
        }
        self.result
    }
}
