//! Teardown accounting

use crate::callreq::CallRequest;
use std::ops::AddAssign;

/// What a teardown released
///
/// A request with N arguments releases N argument subtrees and 3N + 2 text
/// buffers (three per argument, two for the procedure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Released {
    pub arguments: usize,
    pub text_buffers: usize,
}

impl AddAssign for Released {
    fn add_assign(&mut self, other: Released) {
        self.arguments += other.arguments;
        self.text_buffers += other.text_buffers;
    }
}

/// Free a call request and every buffer it owns.
///
/// Takes ownership of the request and all of its substructures. Dropping the
/// request has the same effect; this form reports what was released.
pub fn free_callreq(req: CallRequest) -> Released {
    req.teardown()
}
