//! Recording [`InteractionApi`] used by the framework's tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Map;
use switchboard_core::{
    ApiError, ApiResult, InteractionApi, InteractionCallback, Message, MessageFields,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    Callback {
        interaction_id: String,
        callback: InteractionCallback,
    },
    GetOriginal,
    EditOriginal(MessageFields),
    DeleteOriginal,
    CreateFollowup(MessageFields),
    GetFollowup(String),
    EditFollowup(String, MessageFields),
    DeleteFollowup(String),
}

#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<ApiCall>>,
    fail_callbacks: bool,
}

impl MockApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every `send_callback` fails with a platform error after recording.
    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_callbacks: true,
            ..Self::default()
        })
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn callbacks(&self) -> Vec<InteractionCallback> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ApiCall::Callback { callback, .. } => Some(callback.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }
}

fn message(id: &str, fields: Option<&MessageFields>) -> Message {
    Message {
        id: id.to_string(),
        channel_id: "c1".to_string(),
        content: fields.and_then(|f| f.content.clone()).unwrap_or_default(),
        author: None,
        extra: Map::new(),
    }
}

#[async_trait]
impl InteractionApi for MockApi {
    async fn send_callback(
        &self,
        interaction_id: &str,
        _token: &str,
        callback: &InteractionCallback,
    ) -> ApiResult<()> {
        self.record(ApiCall::Callback {
            interaction_id: interaction_id.to_string(),
            callback: callback.clone(),
        });
        if self.fail_callbacks {
            return Err(ApiError::Platform {
                status: 500,
                message: "upstream unavailable".into(),
            });
        }
        Ok(())
    }

    async fn get_original_response(&self, _token: &str) -> ApiResult<Message> {
        self.record(ApiCall::GetOriginal);
        Ok(message("@original", None))
    }

    async fn edit_original_response(
        &self,
        _token: &str,
        fields: &MessageFields,
    ) -> ApiResult<Message> {
        self.record(ApiCall::EditOriginal(fields.clone()));
        Ok(message("@original", Some(fields)))
    }

    async fn delete_original_response(&self, _token: &str) -> ApiResult<()> {
        self.record(ApiCall::DeleteOriginal);
        Ok(())
    }

    async fn create_followup(&self, _token: &str, fields: &MessageFields) -> ApiResult<Message> {
        self.record(ApiCall::CreateFollowup(fields.clone()));
        Ok(message("f1", Some(fields)))
    }

    async fn get_followup(&self, _token: &str, message_id: &str) -> ApiResult<Message> {
        self.record(ApiCall::GetFollowup(message_id.to_string()));
        Ok(message(message_id, None))
    }

    async fn edit_followup(
        &self,
        _token: &str,
        message_id: &str,
        fields: &MessageFields,
    ) -> ApiResult<Message> {
        self.record(ApiCall::EditFollowup(message_id.to_string(), fields.clone()));
        Ok(message(message_id, Some(fields)))
    }

    async fn delete_followup(&self, _token: &str, message_id: &str) -> ApiResult<()> {
        self.record(ApiCall::DeleteFollowup(message_id.to_string()));
        Ok(())
    }
}
