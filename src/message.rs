use std::collections::HashMap;

/// A single delivery received from the queue.
///
/// The body is opaque to the consumer; only the handler interprets it. The
/// receipt handle is issued per receive and is what acknowledges this
/// particular delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub message_id: Option<String>,
    pub body: Option<String>,
    pub receipt_handle: Option<String>,
    /// String-valued message attributes. Binary attributes are dropped.
    pub message_attributes: HashMap<String, String>,
}

impl Message {
    /// Creates a message with a body and receipt handle and nothing else.
    pub fn new(body: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Message {
            body: Some(body.into()),
            receipt_handle: Some(receipt_handle.into()),
            ..Default::default()
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_attributes.insert(name.into(), value.into());
        self
    }

    /// Message id for log fields, `"unknown"` when the service sent none.
    pub fn id_or_unknown(&self) -> &str {
        self.message_id.as_deref().unwrap_or("unknown")
    }
}

impl From<&aws_sdk_sqs::types::Message> for Message {
    fn from(message: &aws_sdk_sqs::types::Message) -> Self {
        let message_attributes = message
            .message_attributes()
            .map(|attributes| {
                attributes
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .string_value()
                            .map(|v| (name.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Message {
            message_id: message.message_id().map(str::to_string),
            body: message.body().map(str::to_string),
            receipt_handle: message.receipt_handle().map(str::to_string),
            message_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sqs::types::MessageAttributeValue;

    #[test]
    fn converts_sdk_message_keeping_string_attributes() {
        let string_attr = MessageAttributeValue::builder()
            .data_type("String")
            .string_value("alpha")
            .build()
            .unwrap();
        let binary_attr = MessageAttributeValue::builder()
            .data_type("Binary")
            .binary_value(aws_sdk_sqs::primitives::Blob::new(vec![1, 2, 3]))
            .build()
            .unwrap();

        let sdk_message = aws_sdk_sqs::types::Message::builder()
            .message_id("m-1")
            .body("x")
            .receipt_handle("h1")
            .message_attributes("kind", string_attr)
            .message_attributes("raw", binary_attr)
            .build();

        let message = Message::from(&sdk_message);

        assert_eq!(message.message_id.as_deref(), Some("m-1"));
        assert_eq!(message.body.as_deref(), Some("x"));
        assert_eq!(message.receipt_handle.as_deref(), Some("h1"));
        assert_eq!(message.message_attributes.len(), 1);
        assert_eq!(message.message_attributes["kind"], "alpha");
    }

    #[test]
    fn missing_id_reports_unknown() {
        let message = Message::new("body", "handle");
        assert_eq!(message.id_or_unknown(), "unknown");
        assert_eq!(message.with_message_id("abc").id_or_unknown(), "abc");
    }
}
