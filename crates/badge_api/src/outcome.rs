use reqwest::StatusCode;
use url::Url;

/// Coarse result of a mutation attempt, returned instead of a raw status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Success,
    PermissionDenied,
    UnexpectedServerResponse,
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PermissionDenied => "permission_denied",
            Self::UnexpectedServerResponse => "unexpected_server_response",
        }
    }
}

/// How the server answered a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResponse {
    /// Redirect back to the submitted URL: the write was accepted.
    RedirectedToSelf,
    /// Plain success with no redirect. Rails re-renders the form this way
    /// when it drops an invalid field or value.
    Unconfirmed { status: StatusCode },
    /// Anything else, including redirects elsewhere.
    Rejected {
        status: StatusCode,
        location: Option<String>,
    },
}

impl SubmissionResponse {
    /// `Unconfirmed` counts as success because the server did not refuse
    /// the write outright.
    pub fn outcome(&self) -> MutationOutcome {
        match self {
            Self::RedirectedToSelf | Self::Unconfirmed { .. } => MutationOutcome::Success,
            Self::Rejected { .. } => MutationOutcome::UnexpectedServerResponse,
        }
    }
}

/// Classify the response to a submission sent to `request_url`.
///
/// `location` is the raw `Location` header; relative values are resolved
/// against `request_url` before comparing.
pub fn classify_submission(
    request_url: &Url,
    status: StatusCode,
    location: Option<&str>,
) -> SubmissionResponse {
    if status.is_redirection() {
        let target = location.and_then(|value| request_url.join(value).ok());
        if target.as_ref() == Some(request_url) {
            return SubmissionResponse::RedirectedToSelf;
        }
    } else if status.is_success() {
        return SubmissionResponse::Unconfirmed { status };
    }

    SubmissionResponse::Rejected {
        status,
        location: location.map(str::to_owned),
    }
}
