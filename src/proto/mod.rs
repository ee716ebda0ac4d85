//! Protobuf messages and gRPC clients for the `inference` package.
//!
//! Checked in rather than built from `.proto` at compile time, so the crate
//! builds without `protoc`. Wire contract:
//!
//! ```text
//! service InferenceService { rpc GenerateResponse(InferenceRequest) returns (InferenceResponse); }
//! service RAGService       { rpc GetContext(ContextRequest) returns (ContextResponse); }
//! ```

pub mod inference {
    include!("inference.rs");

    pub mod client {
        include!("inference.tonic.rs");
    }
}
