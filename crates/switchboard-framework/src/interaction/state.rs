//! The acknowledgement state of a single interaction.

use switchboard_core::ProtocolViolation;

/// Tracks which replies an interaction has already used up.
///
/// The initial callback is one-shot. Whether it was deferred and whether the
/// deferred result has since been delivered are tracked alongside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckState {
    has_sent_callback: bool,
    is_response_deferred: bool,
    is_deferred_response_sent: bool,
}

impl AckState {
    /// Whether the initial callback has been sent (or attempted).
    pub fn has_sent_callback(&self) -> bool {
        self.has_sent_callback
    }

    /// Whether the initial callback was a deferral.
    pub fn is_response_deferred(&self) -> bool {
        self.is_response_deferred
    }

    /// Whether the original response has been edited or deleted since.
    pub fn is_deferred_response_sent(&self) -> bool {
        self.is_deferred_response_sent
    }

    /// Consumes the one-shot initial callback.
    pub(crate) fn begin_callback(
        &mut self,
        operation: &'static str,
        deferred: bool,
    ) -> Result<(), ProtocolViolation> {
        if self.has_sent_callback {
            return Err(ProtocolViolation::callback_already_sent(operation));
        }
        self.has_sent_callback = true;
        self.is_response_deferred = deferred;
        Ok(())
    }

    /// Fails unless the initial callback has been sent.
    pub(crate) fn require_callback(&self, operation: &'static str) -> Result<(), ProtocolViolation> {
        if self.has_sent_callback {
            Ok(())
        } else {
            Err(ProtocolViolation::callback_not_sent(operation))
        }
    }

    pub(crate) fn mark_result_sent(&mut self) {
        self.is_deferred_response_sent = true;
    }
}
