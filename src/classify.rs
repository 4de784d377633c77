//! Response classification logic

use crate::envelope::ResponseEnvelope;
use crate::transport::TransportError;

/// Semantic outcome of one request attempt.
#[derive(Debug)]
pub enum ClassifiedOutcome {
    Success(ResponseEnvelope),
    BusinessFailure(ResponseEnvelope),
    AuthExpired,
    TransportFailure(TransportError),
}

/// Map a raw transport outcome to a [`ClassifiedOutcome`].
///
/// Rules are checked in order:
/// - a transport-level error wins over everything;
/// - 401 means the session is gone, whatever the body says;
/// - 200 with code 0 or 200 is a success;
/// - 200 with any other code is a business failure;
/// - anything else (including a 200 without a body) is a transport failure.
pub fn classify(
    status: u16,
    body: Option<ResponseEnvelope>,
    transport_error: Option<TransportError>,
) -> ClassifiedOutcome {
    if let Some(err) = transport_error {
        return ClassifiedOutcome::TransportFailure(err);
    }
    if status == 401 {
        return ClassifiedOutcome::AuthExpired;
    }
    match (status, body) {
        (200, Some(envelope)) if envelope.is_success() => ClassifiedOutcome::Success(envelope),
        (200, Some(envelope)) => ClassifiedOutcome::BusinessFailure(envelope),
        (200, None) => {
            ClassifiedOutcome::TransportFailure(TransportError::MalformedBody("empty body".into()))
        }
        (status, _) => ClassifiedOutcome::TransportFailure(TransportError::Status { status }),
    }
}
