//! Ticket check-in.

use podbox_interface::{CheckInRequest, CheckInResult};
use podbox_pcd::SignedCredential;

use crate::request::http_post_simple;
use crate::{PodboxClient, Transport};

impl<T: Transport> PodboxClient<T> {
    /// Ask the server to check in the ticket named by a signed `checkin`
    /// credential. The credential is the whole request; the ticket and action
    /// are inside its payload.
    ///
    /// `AlreadyCheckedIn`, `NotEligible` and the other denials arrive as
    /// failures with those names.
    pub async fn request_check_in(
        &self,
        checkin_url: &str,
        credential: &SignedCredential,
    ) -> CheckInResult {
        let body = CheckInRequest {
            credential: credential.clone(),
        };
        http_post_simple(self.transport(), checkin_url, &body, None).await
    }
}
