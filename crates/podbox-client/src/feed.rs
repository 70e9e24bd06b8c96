//! Feed polling.

use podbox_interface::{PollFeedRequest, PollFeedResult};

use crate::request::http_post_simple;
use crate::{PodboxClient, Transport};

impl<T: Transport> PodboxClient<T> {
    /// Poll a feed. `feed_url` is the full feed URL
    /// (`{base}/generic-issuance/api/feed/{pipelineId}/{feedId}`).
    ///
    /// On success the value holds the folder actions to apply.
    pub async fn request_poll_feed(&self, feed_url: &str, request: &PollFeedRequest) -> PollFeedResult {
        tracing::debug!(feed_url, feed_id = %request.feed_id, "polling feed");
        http_post_simple(self.transport(), feed_url, request, None).await
    }
}
