use serde::Serialize;
use utoipa::ToSchema;

/// Pagination info, present only on paginated list responses.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Payload of error responses; the message is duplicated here so clients can
/// treat `data` uniformly.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    pub fn paginated(message: impl Into<String>, data: T, meta: Meta) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: Some(meta),
        }
    }
}

impl ApiResponse<ErrorBody> {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            data: Some(ErrorBody {
                error: message.clone(),
            }),
            message,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_meta() {
        let resp = ApiResponse::success("ok", json!({"a": 1}));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["message"], "ok");
        assert!(value.get("meta").is_none());
    }

    #[test]
    fn paginated_carries_meta() {
        let meta = Meta {
            page: 2,
            per_page: 10,
            total: 35,
        };
        let resp = ApiResponse::paginated("list", json!([]), meta);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["meta"]["page"], 2);
        assert_eq!(value["meta"]["total"], 35);
    }

    #[test]
    fn failure_mirrors_the_message_into_the_error_body() {
        let resp = ApiResponse::failure("Not Found");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["message"], "Not Found");
        assert_eq!(value["data"]["error"], "Not Found");
        assert!(value.get("meta").is_none());
    }
}
