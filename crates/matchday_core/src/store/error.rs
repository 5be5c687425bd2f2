use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error in {resource}: {source}")]
    Serialization {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema mismatch in {resource}: {reason}")]
    Schema { resource: String, reason: String },

    #[error("Invalid resource name: {name}")]
    InvalidResource { name: String },

    #[error("Invalid namespace: {event_id}")]
    InvalidNamespace { event_id: String },
}
