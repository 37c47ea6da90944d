use crate::client::{ApiClient, ApiRequest, UploadPart};
use crate::error::ApiError;
use crate::types::UploadReceipt;

impl ApiClient {
    /// Uploads a single file as multipart form-data under the `file` field.
    pub async fn upload_file(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError> {
        let part = UploadPart {
            name: "file".to_string(),
            file_name: Some(file_name.to_string()),
            content_type: content_type.map(str::to_string),
            data,
        };
        self.send(ApiRequest::multipart("uploads", vec![part]))
            .await?
            .json()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{client, QueueTransport, StubRefresher};
    use crate::client::RequestBody;

    #[tokio::test]
    async fn upload_sends_one_named_part() {
        let reply = r#"{"id": "f1", "fileName": "essay.pdf"}"#;
        let transport = QueueTransport::new(vec![(200, reply)]);
        let api = client(transport.clone(), StubRefresher::ok("unused"));

        let receipt = api
            .upload_file("essay.pdf", Some("application/pdf"), vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(receipt.id, "f1");
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://campus.test/api/uploads");
        match &seen[0].body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].name, "file");
                assert_eq!(parts[0].file_name.as_deref(), Some("essay.pdf"));
                assert_eq!(parts[0].data, vec![1, 2, 3]);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
