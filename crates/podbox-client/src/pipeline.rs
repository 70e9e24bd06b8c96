//! Pipeline info.

use podbox_core::PipelineId;
use podbox_interface::{PipelineInfoRequest, PipelineInfoResult, PIPELINE_INFO_PATH};

use crate::request::http_post_simple;
use crate::{PodboxClient, Transport};

impl<T: Transport> PodboxClient<T> {
    /// Fetch the administrative summary of a pipeline.
    ///
    /// `base_url` is the server root; the token is sent as a bearer token.
    pub async fn request_pipeline_info(
        &self,
        token: &str,
        base_url: &str,
        pipeline_id: PipelineId,
    ) -> PipelineInfoResult {
        let url = format!("{}{}", base_url.trim_end_matches('/'), PIPELINE_INFO_PATH);
        let body = PipelineInfoRequest { pipeline_id };
        http_post_simple(self.transport(), &url, &body, Some(token)).await
    }
}
